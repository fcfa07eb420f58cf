//! Property tests over generated requests.

use marquee_core::{ContractError, IdScheme, ShowId, TheatreNo};
use marquee_testkit::prelude::*;
use proptest::prelude::*;
use serde_json::json;

proptest! {
    #![proptest_config(PropTestConfig::quick().to_proptest_config())]

    #[test]
    fn registration_opens_every_window(spec in theatre_spec_strategy(), tx_id in tx_id_strategy()) {
        let ledger = TestLedger::new();
        let body = serde_json::to_string(&spec).unwrap();
        let payload = ledger.invoke_as(&tx_id, "registerTheatre", &body).unwrap();

        let theatre_no = TheatreNo::new(IdScheme::Sha256.derive(&tx_id));
        prop_assert_eq!(payload, format!("MovieTheatre Number:{theatre_no}"));
        prop_assert_eq!(ledger.theatre(theatre_no).windows, spec.windows);

        let windows = u32::try_from(spec.windows).unwrap();
        for n in 1..=windows {
            prop_assert_eq!(ledger.window(n).tickets_sold, 0);
        }
        let missing_key = format!("WINDOW{}", windows + 1);
        prop_assert!(ledger.get(&missing_key).is_none());
    }

    #[test]
    fn scheduling_allocates_consecutive_ids(
        spec in theatre_spec_strategy(),
        movies in movie_list_strategy(4),
    ) {
        let ledger = TestLedger::new();
        let theatre_no = scenarios::registered_theatre(&ledger, &spec);
        let body = json!({ "theatreNo": theatre_no, "shows": movies }).to_string();
        let result = ledger.invoke("createShow", &body);

        let requested = i64::try_from(movies.len()).unwrap();
        if requested > spec.halls {
            let too_many = matches!(result, Err(ContractError::TooManyMovies { .. }));
            prop_assert!(too_many);
            prop_assert_eq!(ledger.counter("NEXT_SHOW_ID"), 0);
            return Ok(());
        }
        result.unwrap();

        let expected = u64::try_from(requested * spec.shows_daily).unwrap();
        prop_assert_eq!(ledger.counter("NEXT_SHOW_ID"), expected);
        for id in 1..=expected {
            let show = ledger.show(ShowId::new(id));
            prop_assert_eq!(show.quantity, spec.tickets_per_show);
            prop_assert_eq!(show.theatre_no, theatre_no);
            prop_assert!(i64::from(show.hall_no) <= spec.halls);
        }
        let missing_key = format!("SHOW{}", expected + 1);
        prop_assert!(ledger.get(&missing_key).is_none());
    }

    #[test]
    fn purchases_never_oversell(sizes in prop::collection::vec(purchase_size_strategy(), 1..8)) {
        let ledger = TestLedger::new();
        let theatre_no = scenarios::registered_theatre(&ledger, &theatre_spec(1, 1, 1));
        let show_id = scenarios::scheduled_show(&ledger, theatre_no, "Heat");

        let mut remaining = 100i64;
        let mut sold = 0i64;
        for quantity in sizes {
            let result = ledger.invoke("purchaseTicket", &scenarios::purchase_body(show_id, 1, quantity));
            if quantity > 0 && quantity <= remaining {
                prop_assert!(result.is_ok());
                remaining -= quantity;
                sold += quantity;
            } else {
                prop_assert!(result.is_err());
            }
            prop_assert_eq!(ledger.show(show_id).quantity, remaining);
            prop_assert_eq!(ledger.window(1).tickets_sold, sold);
        }
    }

    #[test]
    fn exchange_requires_even_coupon(coupon_tx in tx_id_strategy()) {
        let ledger = TestLedger::new();
        let theatre_no = scenarios::registered_theatre(&ledger, &theatre_spec(1, 1, 1));
        let show_id = scenarios::scheduled_show(&ledger, theatre_no, "Heat");
        let ticket_no = scenarios::sold_ticket(&ledger, show_id, 7);

        ledger.invoke_as(&coupon_tx, "issueCoupon", &scenarios::ticket_body(ticket_no)).unwrap();
        let result = ledger.invoke("availExchange", &scenarios::ticket_body(ticket_no));

        let even = IdScheme::Sha256.derive(&coupon_tx) % 2 == 0;
        prop_assert_eq!(result.is_ok(), even);
        prop_assert_eq!(ledger.ticket(ticket_no).exchange_availed, even);
        let expected_stock = if even { 493 } else { 500 };
        prop_assert_eq!(ledger.theatre(theatre_no).soda_stock, expected_stock);
    }
}
