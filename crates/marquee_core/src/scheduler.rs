//! Show scheduling.

use crate::entity::{Show, Theatre};
use crate::error::{ContractError, ContractResult};
use crate::sequence::{Counter, SequenceAllocator};
use crate::store::EntityStore;
use crate::types::{DocType, ShowId, TheatreNo};
use marquee_ledger::LedgerStub;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One movie to schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MovieRequest {
    /// Movie title.
    pub movie: String,
    /// Hall to run in. Zero or absent means "by position in the list".
    pub hall_no: u32,
}

/// Request body for `createShow`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShows {
    /// Theatre to schedule in.
    pub theatre_no: TheatreNo,
    /// Movies to schedule, at most one per hall.
    #[serde(default)]
    pub shows: Vec<MovieRequest>,
}

/// Expands a movie list into concrete shows.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowScheduler;

impl ShowScheduler {
    /// Creates `showsDaily` shows for every requested movie.
    ///
    /// Each show gets a fresh id from `NEXT_SHOW_ID`, the slot index as its
    /// `showSlot`, and a full house of `ticketsPerShow` seats. Shows are
    /// returned in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::NotFound`] for an unknown theatre,
    /// [`ContractError::TooManyMovies`] if the list is longer than the hall
    /// count, a validation error for an out-of-range `hallNo`, or a storage
    /// error.
    pub fn create_shows<S: LedgerStub + ?Sized>(
        &self,
        store: &mut EntityStore<'_, S>,
        request: &CreateShows,
    ) -> ContractResult<Vec<Show>> {
        let theatre: Theatre = store.load(request.theatre_no)?;

        let requested = request.shows.len();
        if i64::try_from(requested).map_or(true, |n| n > theatre.halls) {
            warn!(theatre_no = %theatre.theatre_no, requested, halls = theatre.halls, "too many movies");
            return Err(ContractError::TooManyMovies {
                requested,
                halls: theatre.halls,
            });
        }

        let shows_daily = u32::try_from(theatre.shows_daily).map_err(|_| {
            ContractError::invalid_request(format!(
                "theatre {} has an unusable showsDaily of {}",
                theatre.theatre_no, theatre.shows_daily
            ))
        })?;

        let mut created = Vec::new();
        for (position, movie) in request.shows.iter().enumerate() {
            let hall_no = Self::hall_for(&theatre, position, movie)?;
            for slot in 1..=shows_daily {
                let show_id = ShowId::new(SequenceAllocator::next(store, Counter::NextShowId)?);
                let show = Show {
                    show_id,
                    movie: movie.movie.clone(),
                    show_slot: slot.to_string(),
                    quantity: theatre.tickets_per_show,
                    hall_no,
                    theatre_no: theatre.theatre_no,
                    doc_type: DocType::Show,
                };
                store.save(&show)?;
                created.push(show);
            }
        }

        info!(
            theatre_no = %theatre.theatre_no,
            movies = requested,
            shows = created.len(),
            "shows scheduled"
        );
        Ok(created)
    }

    fn hall_for(theatre: &Theatre, position: usize, movie: &MovieRequest) -> ContractResult<u32> {
        if movie.hall_no == 0 {
            return u32::try_from(position + 1)
                .map_err(|_| ContractError::invalid_request("too many movies"));
        }
        if i64::from(movie.hall_no) > theatre.halls {
            return Err(ContractError::invalid_request(format!(
                "hall {} does not exist in theatre {} ({} halls)",
                movie.hall_no, theatre.theatre_no, theatre.halls
            )));
        }
        Ok(movie.hall_no)
    }
}
