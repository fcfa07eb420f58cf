//! Theatre record.

use crate::entity::Entity;
use crate::types::{DocType, TheatreNo};
use serde::{Deserialize, Serialize};

/// A registered theatre.
///
/// Capacity fields are fixed at registration. `soda_stock` is the only field
/// that changes afterwards, and only through soda exchanges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theatre {
    /// Theatre number.
    pub theatre_no: TheatreNo,
    /// Display name.
    pub theatre_name: String,
    /// Number of sales windows.
    pub windows: i64,
    /// Seats per show.
    pub tickets_per_show: i64,
    /// Show slots per day, per hall.
    pub shows_daily: i64,
    /// Soda units on hand. May go negative.
    pub soda_stock: i64,
    /// Number of halls.
    pub halls: i64,
    /// Always [`DocType::Theatre`].
    pub doc_type: DocType,
}

impl Entity for Theatre {
    const DOC_TYPE: DocType = DocType::Theatre;
    type Id = TheatreNo;

    fn id(&self) -> TheatreNo {
        self.theatre_no
    }
}
