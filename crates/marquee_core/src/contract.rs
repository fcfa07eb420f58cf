//! Invocation surface.
//!
//! A [`Contract`] maps a function name and its single JSON argument onto one
//! of the services, runs it against the caller's transaction, and renders the
//! response payload. The caller owns the transaction: it commits when
//! [`Contract::invoke`] returns `Ok` and aborts otherwise.

use crate::config::Config;
use crate::coupon::{CouponService, TicketRef};
use crate::error::{ContractError, ContractResult};
use crate::exchange::ExchangeService;
use crate::query::QueryGateway;
use crate::registry::{RegisterTheatre, TheatreRegistry};
use crate::sales::{PurchaseRequest, TicketSalesEngine};
use crate::scheduler::{CreateShows, ShowScheduler};
use crate::sequence::SequenceAllocator;
use crate::store::EntityStore;
use marquee_ledger::LedgerStub;
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Arguments every function takes.
const ARGUMENT_COUNT: usize = 1;

/// Functions exposed by the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    /// `registerTheatre`
    RegisterTheatre,
    /// `createShow`, also accepted as `createShows`
    CreateShows,
    /// `purchaseTicket`
    PurchaseTicket,
    /// `issueCoupon`
    IssueCoupon,
    /// `availExchange`
    AvailExchange,
    /// `queryByString`
    QueryByString,
}

impl Function {
    /// All functions, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::RegisterTheatre,
        Self::CreateShows,
        Self::PurchaseTicket,
        Self::IssueCoupon,
        Self::AvailExchange,
        Self::QueryByString,
    ];

    /// Returns the canonical invocation name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RegisterTheatre => "registerTheatre",
            Self::CreateShows => "createShow",
            Self::PurchaseTicket => "purchaseTicket",
            Self::IssueCoupon => "issueCoupon",
            Self::AvailExchange => "availExchange",
            Self::QueryByString => "queryByString",
        }
    }
}

impl FromStr for Function {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registerTheatre" => Ok(Self::RegisterTheatre),
            "createShow" | "createShows" => Ok(Self::CreateShows),
            "purchaseTicket" => Ok(Self::PurchaseTicket),
            "issueCoupon" => Ok(Self::IssueCoupon),
            "availExchange" => Ok(Self::AvailExchange),
            "queryByString" => Ok(Self::QueryByString),
            other => Err(ContractError::UnknownFunction(other.to_string())),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The ticketing contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct Contract {
    config: Config,
}

impl Contract {
    /// Creates a contract with the given configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Returns the contract's configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Seeds the sequence counters. Run once, when the contract is deployed.
    ///
    /// # Errors
    ///
    /// Returns an error if the counters cannot be written.
    pub fn init<S: LedgerStub + ?Sized>(&self, stub: &mut S) -> ContractResult<()> {
        let mut store = EntityStore::new(stub);
        SequenceAllocator::init(&mut store)?;
        info!(tx_id = %store.tx_id(), "contract initialized");
        Ok(())
    }

    /// Invokes `function` with `args` and returns the response payload.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown function, a wrong argument
    /// count or an unparsable body; otherwise whatever the operation returns.
    pub fn invoke<S, A>(&self, stub: &mut S, function: &str, args: &[A]) -> ContractResult<Vec<u8>>
    where
        S: LedgerStub + ?Sized,
        A: AsRef<str>,
    {
        let function: Function = function.parse()?;
        let [arg] = args else {
            return Err(ContractError::ArgumentCount {
                expected: ARGUMENT_COUNT,
                actual: args.len(),
            });
        };
        let arg = arg.as_ref();

        let mut store = EntityStore::new(stub);
        debug!(tx_id = %store.tx_id(), %function, "invoke");

        match function {
            Function::RegisterTheatre => {
                let request: RegisterTheatre = parse(function, arg)?;
                let theatre = TheatreRegistry::new(self.config.id_scheme)
                    .register(&mut store, &request)?;
                Ok(format!("MovieTheatre Number:{}", theatre.theatre_no).into_bytes())
            }
            Function::CreateShows => {
                let request: CreateShows = parse(function, arg)?;
                ShowScheduler.create_shows(&mut store, &request)?;
                Ok(store.tx_id().as_bytes().to_vec())
            }
            Function::PurchaseTicket => {
                let request: PurchaseRequest = parse(function, arg)?;
                TicketSalesEngine.purchase(&mut store, &request)?;
                Ok(store.tx_id().as_bytes().to_vec())
            }
            Function::IssueCoupon => {
                let request: TicketRef = parse(function, arg)?;
                let ticket = CouponService::new(self.config.id_scheme).issue(&mut store, &request)?;
                Ok(format!("Coupon Number:{}", ticket.coupon_number).into_bytes())
            }
            Function::AvailExchange => {
                let request: TicketRef = parse(function, arg)?;
                ExchangeService::new(self.config.enforce_soda_floor).redeem(&mut store, &request)?;
                Ok(store.tx_id().as_bytes().to_vec())
            }
            Function::QueryByString => QueryGateway.query(&store, arg),
        }
    }
}

fn parse<T: DeserializeOwned>(function: Function, arg: &str) -> ContractResult<T> {
    serde_json::from_str(arg).map_err(|source| ContractError::malformed(function.name(), source))
}
