//! Optimistic interaction helpers: follow, like and play count.
//!
//! Each helper follows the same sequence:
//!
//! 1. Skip if the same operation is already in flight for this entity.
//! 2. Apply the new value locally.
//! 3. Call the social API.
//! 4. On success keep the value (or the server's, when it returns one).
//! 5. On failure restore the pre-operation value and return the error.
//!
//! Helpers are per entity and owned by whichever surface displays them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ridecast_domain::{LikeState, Optimistic, PostId, UserId};

use crate::application::error::InteractionError;
use crate::ports::outbound::{ApiError, SocialApiPort};

/// How an optimistic operation ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome<T> {
    /// The server accepted the change; this is the settled value.
    Confirmed(T),
    /// An identical operation was already in flight, or there was nothing to do.
    Skipped,
}

/// Shared optimistic slot used by every helper.
struct OptimisticCell<T> {
    state: Mutex<Optimistic<T>>,
}

impl<T: Clone> OptimisticCell<T> {
    fn new(value: T) -> Self {
        Self {
            state: Mutex::new(Optimistic::new(value)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Optimistic<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn value(&self) -> T {
        self.lock().value().clone()
    }

    fn is_pending(&self) -> bool {
        self.lock().is_pending()
    }

    /// Apply `next(current)` optimistically and return it, or `None` if a
    /// mutation is already pending.
    fn begin(&self, next: impl FnOnce(&T) -> T) -> Option<T> {
        let mut state = self.lock();
        let optimistic = next(state.value());
        state.begin(optimistic.clone()).ok()?;
        Some(optimistic)
    }

    fn settle(&self, result: Result<Option<T>, ApiError>) -> Result<T, InteractionError> {
        let mut state = self.lock();
        match result {
            Ok(confirmed) => Ok(state.confirm(confirmed).clone()),
            Err(error) => {
                state.rollback();
                Err(InteractionError::rejected(error))
            }
        }
    }

    fn refresh(&self, value: T) -> bool {
        self.lock().refresh(value)
    }
}

/// Follow state for one user.
pub struct FollowToggle {
    api: Arc<dyn SocialApiPort>,
    user_id: UserId,
    following: OptimisticCell<bool>,
}

impl FollowToggle {
    pub fn new(api: Arc<dyn SocialApiPort>, user_id: UserId, following: bool) -> Self {
        Self {
            api,
            user_id,
            following: OptimisticCell::new(following),
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn is_following(&self) -> bool {
        self.following.value()
    }

    pub fn is_pending(&self) -> bool {
        self.following.is_pending()
    }

    /// Load the server's follow status. Ignored while a toggle is in flight.
    pub async fn refresh(&self) -> Result<bool, InteractionError> {
        let following = self
            .api
            .is_following(&self.user_id)
            .await
            .map_err(InteractionError::rejected)?;
        self.following.refresh(following);
        Ok(self.is_following())
    }

    pub async fn toggle(&self) -> Result<InteractionOutcome<bool>, InteractionError> {
        let Some(follow) = self.following.begin(|following| !following) else {
            tracing::debug!(user_id = %self.user_id, "Follow toggle already in flight");
            return Ok(InteractionOutcome::Skipped);
        };

        let result = if follow {
            self.api.follow_user(&self.user_id).await
        } else {
            self.api.unfollow_user(&self.user_id).await
        };
        if let Err(error) = &result {
            tracing::warn!(user_id = %self.user_id, %error, "Follow change rejected; rolling back");
        }

        self.following
            .settle(result.map(|()| None))
            .map(InteractionOutcome::Confirmed)
    }
}

/// Like state (flag and count) for one post.
pub struct LikeToggle {
    api: Arc<dyn SocialApiPort>,
    post_id: PostId,
    state: OptimisticCell<LikeState>,
}

impl LikeToggle {
    /// Starts as not liked until [`refresh`](Self::refresh) loads the real status.
    pub fn new(api: Arc<dyn SocialApiPort>, post_id: PostId, like_count: u64) -> Self {
        Self {
            api,
            post_id,
            state: OptimisticCell::new(LikeState::new(false, like_count)),
        }
    }

    pub fn state(&self) -> LikeState {
        self.state.value()
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub async fn refresh(&self) -> Result<LikeState, InteractionError> {
        let status = self
            .api
            .post_like_status(&self.post_id)
            .await
            .map_err(InteractionError::rejected)?;
        self.state.refresh(status);
        Ok(self.state())
    }

    pub async fn toggle(&self) -> Result<InteractionOutcome<LikeState>, InteractionError> {
        let Some(next) = self.state.begin(|state| state.toggled()) else {
            tracing::debug!(post_id = %self.post_id, "Like toggle already in flight");
            return Ok(InteractionOutcome::Skipped);
        };

        let result = if next.liked {
            self.api.like_post(&self.post_id).await
        } else {
            self.api.unlike_post(&self.post_id).await
        };
        if let Err(error) = &result {
            tracing::warn!(post_id = %self.post_id, %error, "Like change rejected; rolling back");
        }

        self.state
            .settle(result.map(|()| None))
            .map(InteractionOutcome::Confirmed)
    }
}

/// Records plays of one post's audio, at most once per playback.
pub struct PlayCountRecorder {
    api: Arc<dyn SocialApiPort>,
    post_id: PostId,
    count: OptimisticCell<u64>,
    recorded: Mutex<bool>,
}

impl PlayCountRecorder {
    pub fn new(api: Arc<dyn SocialApiPort>, post_id: PostId, play_count: u64) -> Self {
        Self {
            api,
            post_id,
            count: OptimisticCell::new(play_count),
            recorded: Mutex::new(false),
        }
    }

    pub fn play_count(&self) -> u64 {
        self.count.value()
    }

    fn recorded(&self) -> MutexGuard<'_, bool> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Allow the next [`record_play`](Self::record_play) to count again,
    /// e.g. when the post is played from the start a second time.
    pub fn start_new_playback(&self) {
        *self.recorded() = false;
    }

    /// Count a play and report its duration. A failed report is rolled back
    /// and may be retried.
    pub async fn record_play(
        &self,
        duration: f64,
    ) -> Result<InteractionOutcome<u64>, InteractionError> {
        if *self.recorded() {
            return Ok(InteractionOutcome::Skipped);
        }
        if self.count.begin(|count| count.saturating_add(1)).is_none() {
            return Ok(InteractionOutcome::Skipped);
        }

        let result = self.api.play_post(&self.post_id, duration).await;
        match &result {
            Ok(_) => *self.recorded() = true,
            Err(error) => {
                tracing::warn!(post_id = %self.post_id, %error, "Play report rejected; rolling back")
            }
        }

        self.count.settle(result).map(InteractionOutcome::Confirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::fixtures::api_rejected;
    use crate::ports::outbound::{MockSocialApiPort, GENERIC_ERROR_MESSAGE};
    use async_trait::async_trait;
    use mockall::predicate::*;
    use tokio::sync::watch;

    /// Holds mutations open until [`open`](Self::open) is called.
    struct GatedSocialApi {
        gate: watch::Sender<bool>,
        calls: Mutex<Vec<String>>,
    }

    impl GatedSocialApi {
        fn new() -> Self {
            Self {
                gate: watch::channel(false).0,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn open(&self) {
            self.gate.send_replace(true);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        async fn held(&self, call: String) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(call);
            let mut gate = self.gate.subscribe();
            gate.wait_for(|open| *open)
                .await
                .map(|_| ())
                .map_err(|_| ApiError::Network("gate dropped".into()))
        }
    }

    #[async_trait]
    impl SocialApiPort for GatedSocialApi {
        async fn follow_user(&self, user_id: &UserId) -> Result<(), ApiError> {
            self.held(format!("follow {user_id}")).await
        }

        async fn unfollow_user(&self, user_id: &UserId) -> Result<(), ApiError> {
            self.held(format!("unfollow {user_id}")).await
        }

        async fn is_following(&self, _user_id: &UserId) -> Result<bool, ApiError> {
            Ok(false)
        }

        async fn like_post(&self, post_id: &PostId) -> Result<(), ApiError> {
            self.held(format!("like {post_id}")).await
        }

        async fn unlike_post(&self, post_id: &PostId) -> Result<(), ApiError> {
            self.held(format!("unlike {post_id}")).await
        }

        async fn post_like_status(&self, _post_id: &PostId) -> Result<LikeState, ApiError> {
            Ok(LikeState::new(false, 0))
        }

        async fn play_post(&self, post_id: &PostId, _duration: f64) -> Result<Option<u64>, ApiError> {
            self.held(format!("play {post_id}")).await.map(|()| None)
        }
    }

    async fn until(condition: impl Fn() -> bool) {
        while !condition() {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn follow_success_keeps_optimistic_value() {
        let mut api = MockSocialApiPort::new();
        api.expect_follow_user()
            .with(eq(UserId::new("u1")))
            .times(1)
            .returning(|_| Ok(()));

        let toggle = FollowToggle::new(Arc::new(api), UserId::new("u1"), false);
        let outcome = toggle.toggle().await.unwrap();

        assert_eq!(outcome, InteractionOutcome::Confirmed(true));
        assert!(toggle.is_following());
        assert!(!toggle.is_pending());
    }

    #[tokio::test]
    async fn follow_failure_rolls_back_and_reports_message() {
        let mut api = MockSocialApiPort::new();
        api.expect_follow_user()
            .returning(|_| Err(api_rejected("You cannot follow yourself")));

        let toggle = FollowToggle::new(Arc::new(api), UserId::new("u1"), false);
        let err = toggle.toggle().await.unwrap_err();

        assert_eq!(err.user_message(), "You cannot follow yourself");
        assert!(!toggle.is_following());
    }

    #[tokio::test]
    async fn unfollow_failure_without_message_uses_fallback() {
        let mut api = MockSocialApiPort::new();
        api.expect_unfollow_user()
            .returning(|_| Err(ApiError::Network("reset".into())));

        let toggle = FollowToggle::new(Arc::new(api), UserId::new("u1"), true);
        let err = toggle.toggle().await.unwrap_err();

        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
        assert!(toggle.is_following());
    }

    #[tokio::test]
    async fn follow_toggle_in_flight_skips_second_toggle() {
        let api = Arc::new(GatedSocialApi::new());
        let toggle = Arc::new(FollowToggle::new(api.clone(), UserId::new("u1"), false));

        let first = tokio::spawn({
            let toggle = Arc::clone(&toggle);
            async move { toggle.toggle().await }
        });
        until(|| toggle.is_pending()).await;

        assert_eq!(toggle.toggle().await.unwrap(), InteractionOutcome::Skipped);
        assert!(toggle.is_following());

        api.open();
        assert_eq!(
            first.await.unwrap().unwrap(),
            InteractionOutcome::Confirmed(true)
        );
        assert!(!toggle.is_pending());
        assert_eq!(api.calls(), vec!["follow u1".to_string()]);
    }

    #[tokio::test]
    async fn like_toggle_in_flight_skips_second_toggle() {
        let api = Arc::new(GatedSocialApi::new());
        let toggle = Arc::new(LikeToggle::new(api.clone(), PostId::new("p1"), 4));

        let first = tokio::spawn({
            let toggle = Arc::clone(&toggle);
            async move { toggle.toggle().await }
        });
        until(|| toggle.is_pending()).await;

        assert_eq!(toggle.toggle().await.unwrap(), InteractionOutcome::Skipped);
        assert_eq!(toggle.state(), LikeState::new(true, 5));

        api.open();
        assert_eq!(
            first.await.unwrap().unwrap(),
            InteractionOutcome::Confirmed(LikeState::new(true, 5))
        );
        assert_eq!(api.calls(), vec!["like p1".to_string()]);
    }

    #[tokio::test]
    async fn refresh_loads_follow_status() {
        let mut api = MockSocialApiPort::new();
        api.expect_is_following().returning(|_| Ok(true));

        let toggle = FollowToggle::new(Arc::new(api), UserId::new("u1"), false);
        assert!(toggle.refresh().await.unwrap());
        assert!(toggle.is_following());
    }

    #[tokio::test]
    async fn like_toggle_updates_flag_and_count() {
        let mut api = MockSocialApiPort::new();
        api.expect_like_post().times(1).returning(|_| Ok(()));
        api.expect_unlike_post().times(1).returning(|_| Ok(()));

        let toggle = LikeToggle::new(Arc::new(api), PostId::new("p1"), 9);
        assert_eq!(
            toggle.toggle().await.unwrap(),
            InteractionOutcome::Confirmed(LikeState::new(true, 10))
        );
        assert_eq!(
            toggle.toggle().await.unwrap(),
            InteractionOutcome::Confirmed(LikeState::new(false, 9))
        );
    }

    #[tokio::test]
    async fn like_failure_restores_exact_previous_state() {
        let mut api = MockSocialApiPort::new();
        api.expect_post_like_status()
            .returning(|_| Ok(LikeState::new(true, 12)));
        api.expect_unlike_post()
            .returning(|_| Err(ApiError::status(500, "")));

        let toggle = LikeToggle::new(Arc::new(api), PostId::new("p1"), 0);
        toggle.refresh().await.unwrap();
        assert!(toggle.toggle().await.is_err());

        assert_eq!(toggle.state(), LikeState::new(true, 12));
    }

    #[tokio::test]
    async fn play_is_recorded_once_per_playback() {
        let mut api = MockSocialApiPort::new();
        api.expect_play_post()
            .with(eq(PostId::new("p1")), eq(45.0))
            .times(2)
            .returning(|_, _| Ok(None));

        let recorder = PlayCountRecorder::new(Arc::new(api), PostId::new("p1"), 3);
        assert_eq!(
            recorder.record_play(45.0).await.unwrap(),
            InteractionOutcome::Confirmed(4)
        );
        assert_eq!(
            recorder.record_play(45.0).await.unwrap(),
            InteractionOutcome::Skipped
        );

        recorder.start_new_playback();
        recorder.record_play(45.0).await.unwrap();
        assert_eq!(recorder.play_count(), 5);
    }

    #[tokio::test]
    async fn server_play_count_wins_and_failures_roll_back() {
        let mut api = MockSocialApiPort::new();
        let mut calls = 0;
        api.expect_play_post().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Err(ApiError::Network("offline".into()))
            } else {
                Ok(Some(40))
            }
        });

        let recorder = PlayCountRecorder::new(Arc::new(api), PostId::new("p1"), 30);
        assert!(recorder.record_play(12.0).await.is_err());
        assert_eq!(recorder.play_count(), 30);

        assert_eq!(
            recorder.record_play(12.0).await.unwrap(),
            InteractionOutcome::Confirmed(40)
        );
    }
}
