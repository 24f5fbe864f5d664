//! App Router

use salvo::Router;

use crate::{carts, checkout, healthcheck, observability::metrics_handler, payments, tracks};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(metrics_handler))
        .push(
            Router::with_path("tracks")
                .get(tracks::index::handler)
                .push(Router::with_path("featured").get(tracks::featured::handler))
                .push(Router::with_path("facets").get(tracks::facets::handler))
                .push(Router::with_path("{id}").get(tracks::get::handler)),
        )
        .push(
            Router::with_path("carts")
                .post(carts::create::handler)
                .push(
                    Router::with_path("{cart}")
                        .get(carts::get::handler)
                        .delete(carts::delete::handler)
                        .push(Router::with_path("toggle").post(carts::toggle::handler))
                        .push(Router::with_path("checkout").post(carts::checkout::handler))
                        .push(
                            Router::with_path("items")
                                .post(carts::items::create::handler)
                                .delete(carts::items::clear::handler)
                                .push(
                                    Router::with_path("{track}")
                                        .put(carts::items::update::handler)
                                        .delete(carts::items::delete::handler),
                                ),
                        ),
                ),
        )
        .push(
            Router::with_path("payments")
                .push(Router::with_path("initialize").post(payments::initialize::handler))
                .push(Router::with_path("verify").get(payments::verify::handler))
                .push(Router::with_path("callback").get(payments::callback::handler)),
        )
        .push(
            Router::with_path("checkout")
                .get(checkout::status::handler)
                .post(checkout::create::handler),
        )
}
