//! Sales window record.

use crate::entity::Entity;
use crate::types::{DocType, WindowNo};
use serde::{Deserialize, Serialize};

/// A ticket sales window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    /// Window number.
    pub window_no: WindowNo,
    /// Tickets sold through this window. Never decreases.
    pub tickets_sold: i64,
    /// Always [`DocType::Window`].
    pub doc_type: DocType,
}

impl Window {
    /// Creates a window with no sales.
    #[must_use]
    pub fn open(window_no: WindowNo) -> Self {
        Self {
            window_no,
            tickets_sold: 0,
            doc_type: DocType::Window,
        }
    }
}

impl Entity for Window {
    const DOC_TYPE: DocType = DocType::Window;
    type Id = WindowNo;

    fn id(&self) -> WindowNo {
        self.window_no
    }
}
