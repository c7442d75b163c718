//! Feature router contract.
//!
//! Feature routers (authentication, lead lists, scripts, scheduling, subscriptions, AI
//! training, analytics, AI feedback) are built outside the pipeline and handed to
//! `router::router` through [`FeatureRouters`]. Each one is an ordinary `Router<AppState>`
//! with routes relative to its mount prefix. A feature router must not install its own
//! fallback: requests it does not claim, by path or by method, continue to the next
//! mounted router.

use axum::Router;

use crate::server::state::AppState;

/// Path prefix for routers mounted at the root.
pub const ROOT_PREFIX: &str = "/";
/// Path prefix shared by the API routers.
pub const API_PREFIX: &str = "/api";
/// Path prefix of the subscription router.
pub const SUBSCRIPTION_PREFIX: &str = "/subscription";

/// A feature router together with the prefix it is mounted under.
pub struct Mount {
    /// Name used in startup logs
    pub name: &'static str,
    /// Mount prefix, `/` for root-mounted routers
    pub prefix: &'static str,
    /// Routes relative to the prefix
    pub router: Router<AppState>,
}

/// One slot per feature router, each defaulting to an empty router.
///
/// The mount order is fixed by [`FeatureRouters::into_mounts`]; it decides which router
/// wins when several claim the same request and must not change without a migration note.
pub struct FeatureRouters {
    /// Authentication (login, logout, registration), root-mounted
    pub auth: Router<AppState>,
    /// Lead-list upload, root-mounted
    pub lead_list: Router<AppState>,
    /// AI script suggestion and saving, under `/api`
    pub script: Router<AppState>,
    /// Call scheduling, under `/api`
    pub schedule: Router<AppState>,
    /// Subscription management, under `/subscription`
    pub subscription: Router<AppState>,
    /// AI training data upload and training, under `/api`
    pub ai_training: Router<AppState>,
    /// Campaign analytics, under `/api`
    pub analytics: Router<AppState>,
    /// AI feedback submission and analysis, under `/api`
    pub ai_feedback: Router<AppState>,
}

impl FeatureRouters {
    /// Returns the routers in mount order.
    pub fn into_mounts(self) -> Vec<Mount> {
        vec![
            Mount {
                name: "auth",
                prefix: ROOT_PREFIX,
                router: self.auth,
            },
            Mount {
                name: "lead_list",
                prefix: ROOT_PREFIX,
                router: self.lead_list,
            },
            Mount {
                name: "script",
                prefix: API_PREFIX,
                router: self.script,
            },
            Mount {
                name: "schedule",
                prefix: API_PREFIX,
                router: self.schedule,
            },
            Mount {
                name: "subscription",
                prefix: SUBSCRIPTION_PREFIX,
                router: self.subscription,
            },
            Mount {
                name: "ai_training",
                prefix: API_PREFIX,
                router: self.ai_training,
            },
            Mount {
                name: "analytics",
                prefix: API_PREFIX,
                router: self.analytics,
            },
            Mount {
                name: "ai_feedback",
                prefix: API_PREFIX,
                router: self.ai_feedback,
            },
        ]
    }
}

impl Default for FeatureRouters {
    fn default() -> Self {
        Self {
            auth: Router::new(),
            lead_list: Router::new(),
            script: Router::new(),
            schedule: Router::new(),
            subscription: Router::new(),
            ai_training: Router::new(),
            analytics: Router::new(),
            ai_feedback: Router::new(),
        }
    }
}
