use fast_webdav::{Existence, Listing, RequestOutcome, Verb};

#[test]
fn test_classify() {
    let ok = RequestOutcome::classify(Verb::Put, 201);
    assert!(ok.success);
    assert_eq!(ok.status, 201);

    let rejected = RequestOutcome::classify(Verb::Put, 409);
    assert!(!rejected.success);
    assert!(!rejected.is_transport_failure());

    let none = RequestOutcome::no_response();
    assert_eq!(none, RequestOutcome { success: false, status: 0 });
    assert!(none.is_transport_failure());
}

#[test]
fn test_existence_from_outcome() {
    assert_eq!(
        Existence::from_outcome(RequestOutcome::classify(Verb::Head, 200)),
        Existence::Present
    );
    assert_eq!(
        Existence::from_outcome(RequestOutcome::classify(Verb::Head, 404)),
        Existence::Absent { status: 404 }
    );
    assert_eq!(
        Existence::from_outcome(RequestOutcome::classify(Verb::Head, 401)),
        Existence::Absent { status: 401 }
    );
    assert_eq!(
        Existence::from_outcome(RequestOutcome::no_response()),
        Existence::Undetermined
    );
}

#[test]
fn test_existence_back_to_outcome() {
    assert!(Existence::Present.exists());
    assert!(!Existence::Undetermined.exists());
    assert_eq!(
        Existence::Absent { status: 403 }.outcome(),
        RequestOutcome { success: false, status: 403 }
    );
    assert_eq!(Existence::Undetermined.outcome().status, 0);
}

#[test]
fn test_listing_success_follows_outcome() {
    let listing = Listing {
        outcome: RequestOutcome::classify(Verb::Propfind, 404),
        entries: Vec::new(),
    };
    assert!(!listing.is_success());
}
