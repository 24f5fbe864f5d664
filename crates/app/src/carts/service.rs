//! Carts service.

use std::sync::Arc;

use async_trait::async_trait;
use beatstore::{
    cart::{Cart, CartAction, Reduction},
    catalog::Catalog,
    licenses::LicenseType,
    tracks::TrackId,
};
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::{
    carts::{
        errors::CartsServiceError,
        models::{CartSession, CartUuid},
    },
    catalog::CatalogService,
};

type SharedSession = Arc<Mutex<CartSession>>;

/// Carts not changed for this long are dropped when the next cart is created.
pub const CART_IDLE_TIMEOUT: SignedDuration = SignedDuration::from_hours(24 * 7);

/// Carts held in memory, each behind its own lock.
///
/// Every change to a cart, including the catalog read an add needs, happens
/// while that cart's lock is held, so changes to one cart apply one at a time.
pub struct MemoryCartsService {
    catalog: Arc<dyn CatalogService>,
    currency: &'static Currency,
    idle_timeout: SignedDuration,
    sessions: RwLock<FxHashMap<CartUuid, SharedSession>>,
}

impl std::fmt::Debug for MemoryCartsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCartsService")
            .field("currency", &self.currency.iso_alpha_code)
            .finish_non_exhaustive()
    }
}

impl MemoryCartsService {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogService>, currency: &'static Currency) -> Self {
        Self {
            catalog,
            currency,
            idle_timeout: CART_IDLE_TIMEOUT,
            sessions: RwLock::new(FxHashMap::default()),
        }
    }

    #[must_use]
    pub fn with_idle_timeout(mut self, idle_timeout: SignedDuration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Drop carts last changed more than the idle timeout before `now`.
    ///
    /// A cart whose lock is held is in use and stays.
    async fn evict_idle(&self, now: Timestamp) -> usize {
        let Ok(cutoff) = now.checked_sub(self.idle_timeout) else {
            return 0;
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|_, session| {
            !session
                .try_lock()
                .is_ok_and(|session| session.updated_at < cutoff)
        });

        let evicted = before - sessions.len();

        if evicted > 0 {
            debug!(evicted, "evicted idle carts");
        }

        evicted
    }

    async fn session(&self, uuid: CartUuid) -> Result<SharedSession, CartsServiceError> {
        self.sessions
            .read()
            .await
            .get(&uuid)
            .cloned()
            .ok_or(CartsServiceError::NotFound)
    }

    async fn apply(
        &self,
        uuid: CartUuid,
        action: CartAction,
    ) -> Result<(CartSession, Reduction), CartsServiceError> {
        let session = self.session(uuid).await?;
        let mut session = session.lock().await;

        let catalog = match action {
            CartAction::Add { .. } => self.catalog.catalog().await?,
            _ => Catalog::default(),
        };

        let mut cart = session.cart.clone();
        let reduction = cart.apply(action, &catalog)?;

        if reduction == Reduction::Applied {
            session.cart = cart;
            session.updated_at = Timestamp::now();
        }

        Ok((session.clone(), reduction))
    }
}

#[async_trait]
impl CartsService for MemoryCartsService {
    #[tracing::instrument(name = "carts.service.create_cart", skip(self))]
    async fn create_cart(&self) -> CartSession {
        let now = Timestamp::now();

        self.evict_idle(now).await;

        let session = CartSession {
            uuid: CartUuid::now_v7(),
            cart: Cart::new(self.currency),
            created_at: now,
            updated_at: now,
        };

        self.sessions
            .write()
            .await
            .insert(session.uuid, Arc::new(Mutex::new(session.clone())));

        debug!(cart = %session.uuid, "created cart");

        session
    }

    async fn get_cart(&self, uuid: CartUuid) -> Result<CartSession, CartsServiceError> {
        let session = self.session(uuid).await?;
        let session = session.lock().await;

        Ok(session.clone())
    }

    #[tracing::instrument(name = "carts.service.delete_cart", skip(self), err)]
    async fn delete_cart(&self, uuid: CartUuid) -> Result<(), CartsServiceError> {
        self.sessions
            .write()
            .await
            .remove(&uuid)
            .map(|_session| ())
            .ok_or(CartsServiceError::NotFound)
    }

    #[tracing::instrument(name = "carts.service.add_item", skip(self), err)]
    async fn add_item(
        &self,
        uuid: CartUuid,
        track_id: TrackId,
        license: LicenseType,
    ) -> Result<CartSession, CartsServiceError> {
        let action = CartAction::Add {
            track_id: track_id.clone(),
            license,
        };

        match self.apply(uuid, action).await? {
            (session, Reduction::Applied) => Ok(session),
            (_, Reduction::Ignored) => Err(CartsServiceError::TrackNotFound(track_id)),
        }
    }

    #[tracing::instrument(name = "carts.service.remove_item", skip(self), err)]
    async fn remove_item(
        &self,
        uuid: CartUuid,
        track_id: TrackId,
    ) -> Result<CartSession, CartsServiceError> {
        let (session, _) = self.apply(uuid, CartAction::Remove { track_id }).await?;

        Ok(session)
    }

    #[tracing::instrument(name = "carts.service.set_quantity", skip(self), err)]
    async fn set_quantity(
        &self,
        uuid: CartUuid,
        track_id: TrackId,
        quantity: i64,
    ) -> Result<CartSession, CartsServiceError> {
        let (session, _) = self
            .apply(uuid, CartAction::SetQuantity { track_id, quantity })
            .await?;

        Ok(session)
    }

    async fn toggle_panel(&self, uuid: CartUuid) -> Result<CartSession, CartsServiceError> {
        let (session, _) = self.apply(uuid, CartAction::TogglePanel).await?;

        Ok(session)
    }

    #[tracing::instrument(name = "carts.service.clear_cart", skip(self), err)]
    async fn clear_cart(&self, uuid: CartUuid) -> Result<CartSession, CartsServiceError> {
        let (session, _) = self.apply(uuid, CartAction::Clear).await?;

        Ok(session)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Create an empty cart.
    async fn create_cart(&self) -> CartSession;

    /// Retrieve a single cart.
    async fn get_cart(&self, uuid: CartUuid) -> Result<CartSession, CartsServiceError>;

    /// Deletes a cart with the given UUID.
    async fn delete_cart(&self, uuid: CartUuid) -> Result<(), CartsServiceError>;

    /// Add one of a track under a license.
    async fn add_item(
        &self,
        uuid: CartUuid,
        track_id: TrackId,
        license: LicenseType,
    ) -> Result<CartSession, CartsServiceError>;

    /// Remove every line for a track.
    async fn remove_item(
        &self,
        uuid: CartUuid,
        track_id: TrackId,
    ) -> Result<CartSession, CartsServiceError>;

    /// Overwrite a track's quantity; zero or less removes it.
    async fn set_quantity(
        &self,
        uuid: CartUuid,
        track_id: TrackId,
        quantity: i64,
    ) -> Result<CartSession, CartsServiceError>;

    /// Open or close the cart panel.
    async fn toggle_panel(&self, uuid: CartUuid) -> Result<CartSession, CartsServiceError>;

    /// Remove every line.
    async fn clear_cart(&self, uuid: CartUuid) -> Result<CartSession, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rusty_money::iso::GHS;
    use testresult::TestResult;

    use super::*;
    use crate::{
        catalog::{CatalogServiceError, MockCatalogService},
        content::ContentStoreError,
        test,
    };

    const MIDNIGHT: &str = "beat-midnight-drill";

    fn service() -> MemoryCartsService {
        MemoryCartsService::new(test::catalog_service(), GHS)
    }

    fn license() -> TestResult<LicenseType> {
        Ok(LicenseType::new("Premium WAV License")?)
    }

    #[tokio::test]
    async fn create_cart_starts_empty_and_closed() {
        let carts = service();

        let session = carts.create_cart().await;

        assert!(session.cart.is_empty());
        assert!(!session.cart.is_open());
        assert_eq!(session.cart.total().to_minor_units(), 0);
    }

    #[tokio::test]
    async fn unknown_cart_returns_not_found() {
        let carts = service();

        let result = carts.get_cart(CartUuid::now_v7()).await;

        assert!(matches!(result, Err(CartsServiceError::NotFound)));
    }

    #[tokio::test]
    async fn add_item_prices_from_catalog() -> TestResult {
        let carts = service();
        let session = carts.create_cart().await;

        let session = carts
            .add_item(session.uuid, TrackId::from(MIDNIGHT), license()?)
            .await?;

        assert_eq!(session.cart.total().to_minor_units(), 3995);

        Ok(())
    }

    #[tokio::test]
    async fn add_unknown_track_leaves_cart_untouched() -> TestResult {
        let carts = service();
        let session = carts.create_cart().await;

        let result = carts
            .add_item(session.uuid, TrackId::from("beat-missing"), license()?)
            .await;

        assert!(matches!(result, Err(CartsServiceError::TrackNotFound(id)) if id.as_str() == "beat-missing"));
        assert!(carts.get_cart(session.uuid).await?.cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn catalog_failure_is_reported() -> TestResult {
        let mut catalog = MockCatalogService::new();

        catalog.expect_catalog().once().return_once(|| {
            Err(CatalogServiceError::ContentStore(
                ContentStoreError::UnexpectedResponse("unavailable".to_string()),
            ))
        });

        let carts = MemoryCartsService::new(Arc::new(catalog), GHS);
        let session = carts.create_cart().await;

        let result = carts
            .add_item(session.uuid, TrackId::from(MIDNIGHT), license()?)
            .await;

        assert!(matches!(result, Err(CartsServiceError::Catalog(_))));
        assert!(carts.get_cart(session.uuid).await?.cart.is_empty());

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_are_serialized() -> TestResult {
        let mut catalog = MockCatalogService::new();

        catalog.expect_catalog().times(2).returning(|| {
            // Widen the window between reading the cart and writing it back.
            std::thread::sleep(Duration::from_millis(20));

            Ok(Catalog::new(test::tracks()))
        });

        let carts = Arc::new(MemoryCartsService::new(Arc::new(catalog), GHS));
        let uuid = carts.create_cart().await.uuid;

        let first = {
            let carts = Arc::clone(&carts);
            let license = license()?;
            tokio::spawn(async move {
                carts.add_item(uuid, TrackId::from(MIDNIGHT), license).await
            })
        };

        let second = {
            let carts = Arc::clone(&carts);
            let license = license()?;
            tokio::spawn(async move {
                carts.add_item(uuid, TrackId::from(MIDNIGHT), license).await
            })
        };

        first.await??;
        second.await??;

        let session = carts.get_cart(uuid).await?;

        assert_eq!(session.cart.len(), 1);
        assert_eq!(session.cart.items().first().map(|line| line.quantity), Some(2));

        Ok(())
    }

    #[tokio::test]
    async fn set_quantity_zero_removes_line() -> TestResult {
        let carts = service();
        let uuid = carts.create_cart().await.uuid;

        carts.add_item(uuid, TrackId::from(MIDNIGHT), license()?).await?;

        let session = carts.set_quantity(uuid, TrackId::from(MIDNIGHT), 0).await?;

        assert!(session.cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn clear_keeps_panel_state() -> TestResult {
        let carts = service();
        let uuid = carts.create_cart().await.uuid;

        carts.toggle_panel(uuid).await?;
        carts.add_item(uuid, TrackId::from(MIDNIGHT), license()?).await?;

        let session = carts.clear_cart(uuid).await?;

        assert!(session.cart.is_empty());
        assert!(session.cart.is_open());

        Ok(())
    }

    #[tokio::test]
    async fn idle_carts_are_evicted() -> TestResult {
        let carts = service().with_idle_timeout(SignedDuration::from_hours(1));

        let idle = carts.create_cart().await.uuid;
        let busy = carts.create_cart().await.uuid;

        assert_eq!(carts.evict_idle(Timestamp::now()).await, 0);
        assert_eq!(carts.sessions.read().await.len(), 2);

        let later = Timestamp::now().checked_add(SignedDuration::from_hours(2))?;
        let held = carts.session(busy).await?;
        let guard = held.lock().await;

        assert_eq!(carts.evict_idle(later).await, 1);
        assert!(matches!(
            carts.get_cart(idle).await,
            Err(CartsServiceError::NotFound)
        ));

        drop(guard);

        assert_eq!(carts.evict_idle(later).await, 1);
        assert!(carts.sessions.read().await.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn delete_cart_forgets_it() -> TestResult {
        let carts = service();
        let uuid = carts.create_cart().await.uuid;

        carts.delete_cart(uuid).await?;

        assert!(matches!(
            carts.delete_cart(uuid).await,
            Err(CartsServiceError::NotFound)
        ));

        Ok(())
    }
}
