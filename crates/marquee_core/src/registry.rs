//! Theatre registration.

use crate::derive::IdScheme;
use crate::entity::{Theatre, Window};
use crate::error::{ContractError, ContractResult};
use crate::store::EntityStore;
use crate::types::{DocType, TheatreNo, WindowNo};
use marquee_ledger::LedgerStub;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Request body for `registerTheatre`.
///
/// Missing numeric fields default to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterTheatre {
    /// Display name.
    pub theatre_name: String,
    /// Number of sales windows to provision.
    pub windows: i64,
    /// Seats per show.
    pub tickets_per_show: i64,
    /// Show slots per day, per hall.
    pub shows_daily: i64,
    /// Initial soda stock.
    pub soda_stock: i64,
    /// Number of halls.
    pub halls: i64,
}

impl RegisterTheatre {
    fn validate(&self) -> ContractResult<u32> {
        for (field, value) in [
            ("windows", self.windows),
            ("ticketsPerShow", self.tickets_per_show),
            ("showsDaily", self.shows_daily),
            ("halls", self.halls),
        ] {
            if value < 0 {
                return Err(ContractError::invalid_request(format!(
                    "{field} must not be negative, got {value}"
                )));
            }
        }
        u32::try_from(self.halls).map_err(|_| {
            ContractError::invalid_request(format!("too many halls: {}", self.halls))
        })?;
        u32::try_from(self.shows_daily).map_err(|_| {
            ContractError::invalid_request(format!("too many daily shows: {}", self.shows_daily))
        })?;
        u32::try_from(self.tickets_per_show).map_err(|_| {
            ContractError::invalid_request(format!(
                "too many tickets per show: {}",
                self.tickets_per_show
            ))
        })?;
        u32::try_from(self.windows).map_err(|_| {
            ContractError::invalid_request(format!("too many windows: {}", self.windows))
        })
    }
}

/// Registers theatres and provisions their sales windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct TheatreRegistry {
    id_scheme: IdScheme,
}

impl TheatreRegistry {
    /// Creates a registry deriving theatre numbers with `id_scheme`.
    #[must_use]
    pub const fn new(id_scheme: IdScheme) -> Self {
        Self { id_scheme }
    }

    /// Registers a theatre.
    ///
    /// The theatre number is derived from the transaction id. Window records
    /// `WINDOW1..=WINDOWn` are created with no sales; a window key that
    /// already exists is left as it is so its sales count is never rewound.
    /// Earlier deployments overwrote such windows with a zero count.
    ///
    /// # Errors
    ///
    /// Returns a validation error for negative capacities,
    /// [`ContractError::TheatreExists`] if the derived number is taken, or a
    /// storage error.
    pub fn register<S: LedgerStub + ?Sized>(
        &self,
        store: &mut EntityStore<'_, S>,
        request: &RegisterTheatre,
    ) -> ContractResult<Theatre> {
        let windows = request.validate()?;
        let theatre_no = TheatreNo::new(self.id_scheme.derive(store.tx_id()));

        if store.exists::<Theatre>(theatre_no)? {
            return Err(ContractError::TheatreExists { theatre_no });
        }

        let theatre = Theatre {
            theatre_no,
            theatre_name: request.theatre_name.clone(),
            windows: request.windows,
            tickets_per_show: request.tickets_per_show,
            shows_daily: request.shows_daily,
            soda_stock: request.soda_stock,
            halls: request.halls,
            doc_type: DocType::Theatre,
        };
        store.save(&theatre)?;

        for n in 1..=windows {
            let window_no = WindowNo::new(n);
            if store.exists::<Window>(window_no)? {
                debug!(%window_no, "window already provisioned");
                continue;
            }
            store.save(&Window::open(window_no))?;
        }

        info!(
            %theatre_no,
            name = %theatre.theatre_name,
            windows,
            halls = theatre.halls,
            "theatre registered"
        );
        Ok(theatre)
    }
}
