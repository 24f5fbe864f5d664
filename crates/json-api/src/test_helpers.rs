//! Test helpers.

use std::sync::Arc;

use beatstore::{
    cart::Cart,
    fixtures::{Fixture, FixtureError},
    tracks::Track,
};
use beatstore_app::{
    carts::{
        MockCartsService,
        models::{CartSession, CartUuid},
    },
    catalog::MockCatalogService,
    checkout::MockCheckoutService,
    context::AppContext,
    fulfillment::MockFulfillmentService,
    payments::MockPaymentsService,
};
use jiff::Timestamp;
use rusty_money::iso::GHS;
use salvo::{affix_state::inject, prelude::*};

use crate::state::State;

/// Service mocks behind the application context. Each starts with no
/// expectations, so any call a test did not set up fails the test.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) catalog: MockCatalogService,
    pub(crate) carts: MockCartsService,
    pub(crate) payments: MockPaymentsService,
    pub(crate) fulfillment: MockFulfillmentService,
    pub(crate) checkout: MockCheckoutService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            catalog: Arc::new(self.catalog),
            carts: Arc::new(self.carts),
            payments: Arc::new(self.payments),
            fulfillment: Arc::new(self.fulfillment),
            checkout: Arc::new(self.checkout),
            currency: GHS,
        })
    }
}

pub(crate) fn service(mocks: Mocks, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(mocks.into_state())).push(route))
}

/// Tracks from the storefront fixture.
pub(crate) fn tracks() -> Result<Vec<Track>, FixtureError> {
    let mut fixture =
        Fixture::with_base_path(concat!(env!("CARGO_MANIFEST_DIR"), "/../core/fixtures"));

    Ok(fixture.load_tracks("storefront")?.tracks().to_vec())
}

/// Track from the storefront fixture.
pub(crate) fn track(id: &str) -> Result<Track, FixtureError> {
    let mut fixture =
        Fixture::with_base_path(concat!(env!("CARGO_MANIFEST_DIR"), "/../core/fixtures"));

    fixture.load_tracks("storefront")?.track(id).cloned()
}

/// Empty server-side cart priced in cedis.
pub(crate) fn cart_session(uuid: CartUuid) -> CartSession {
    CartSession {
        uuid,
        cart: Cart::new(GHS),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
