//! Show record.

use crate::entity::Entity;
use crate::types::{DocType, ShowId, TheatreNo};
use serde::{Deserialize, Serialize};

/// One screening of a movie in a hall and day slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    /// Show identifier.
    #[serde(rename = "showID")]
    pub show_id: ShowId,
    /// Movie title.
    pub movie: String,
    /// Day slot, `"1"` through `showsDaily`.
    pub show_slot: String,
    /// Seats remaining. Only decreases.
    pub quantity: i64,
    /// Hall the show runs in.
    pub hall_no: u32,
    /// Owning theatre.
    pub theatre_no: TheatreNo,
    /// Always [`DocType::Show`].
    pub doc_type: DocType,
}

impl Entity for Show {
    const DOC_TYPE: DocType = DocType::Show;
    type Id = ShowId;

    fn id(&self) -> ShowId {
        self.show_id
    }
}
