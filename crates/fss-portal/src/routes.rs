//! Routing and the route guard.
//!
//! Paths are parsed once into a [`Route`]; the guard then decides from the
//! route and the session status alone what to show.

use std::fmt;
use std::sync::Arc;

use fss_client::Service;

use crate::session::{SessionManager, SessionStatus};

/// Service pages with their own detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServicePage {
    SoftwareDevelopment,
    DigitalMarketing,
    VideoEditing,
}

impl ServicePage {
    pub const ALL: [ServicePage; 3] = [
        ServicePage::SoftwareDevelopment,
        ServicePage::DigitalMarketing,
        ServicePage::VideoEditing,
    ];

    pub fn service(&self) -> Service {
        match self {
            ServicePage::SoftwareDevelopment => Service::SoftwareDevelopment,
            ServicePage::DigitalMarketing => Service::DigitalMarketing,
            ServicePage::VideoEditing => Service::VideoEditing,
        }
    }

    pub fn slug(&self) -> &'static str {
        self.service().slug()
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.slug() == slug)
    }
}

/// A known location in the site, or the path that matched nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    About,
    Services,
    ServiceDetail(ServicePage),
    Portfolio,
    Testimonials,
    Contact,
    AdminLogin,
    AdminDashboard,
    AdminUsers,
    AdminContacts,
    Unmatched(String),
}

impl Route {
    /// Parse a path. Query strings, fragments, trailing slashes and letter
    /// case are ignored.
    pub fn parse(path: &str) -> Self {
        let end = path.find(['?', '#']).unwrap_or(path.len());
        let normalized = path[..end].trim().trim_end_matches('/').to_ascii_lowercase();
        let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] | ["home"] => Route::Home,
            ["about"] => Route::About,
            ["services"] => Route::Services,
            ["services", slug] => match ServicePage::from_slug(slug) {
                Some(page) => Route::ServiceDetail(page),
                None => Route::Unmatched(path.to_string()),
            },
            ["portfolio"] => Route::Portfolio,
            ["testimonials"] => Route::Testimonials,
            ["contact"] => Route::Contact,
            ["admin", "login"] => Route::AdminLogin,
            ["admin"] | ["admin", "dashboard"] => Route::AdminDashboard,
            ["admin", "users"] => Route::AdminUsers,
            ["admin", "contacts"] => Route::AdminContacts,
            _ => Route::Unmatched(path.to_string()),
        }
    }

    /// Canonical path.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::About => "/about".to_string(),
            Route::Services => "/services".to_string(),
            Route::ServiceDetail(page) => format!("/services/{}", page.slug()),
            Route::Portfolio => "/portfolio".to_string(),
            Route::Testimonials => "/testimonials".to_string(),
            Route::Contact => "/contact".to_string(),
            Route::AdminLogin => "/admin/login".to_string(),
            Route::AdminDashboard => "/admin/dashboard".to_string(),
            Route::AdminUsers => "/admin/users".to_string(),
            Route::AdminContacts => "/admin/contacts".to_string(),
            Route::Unmatched(path) => path.clone(),
        }
    }

    /// Whether the route requires an authenticated session.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::AdminDashboard | Route::AdminUsers | Route::AdminContacts
        )
    }

    /// The view this route renders when allowed.
    pub fn view(&self) -> View {
        match self {
            Route::Home | Route::Unmatched(_) => View::Home,
            Route::About => View::About,
            Route::Services => View::Services,
            Route::ServiceDetail(page) => View::ServiceDetail(*page),
            Route::Portfolio => View::Portfolio,
            Route::Testimonials => View::Testimonials,
            Route::Contact => View::Contact,
            Route::AdminLogin => View::AdminLogin,
            Route::AdminDashboard => View::AdminDashboard,
            Route::AdminUsers => View::AdminUsers,
            Route::AdminContacts => View::AdminContacts,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// What gets rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    About,
    Services,
    ServiceDetail(ServicePage),
    Portfolio,
    Testimonials,
    Contact,
    AdminLogin,
    AdminDashboard,
    AdminUsers,
    AdminContacts,
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::About => "about",
            View::Services => "services",
            View::ServiceDetail(_) => "service-detail",
            View::Portfolio => "portfolio",
            View::Testimonials => "testimonials",
            View::Contact => "contact",
            View::AdminLogin => "admin-login",
            View::AdminDashboard => "admin-dashboard",
            View::AdminUsers => "admin-users",
            View::AdminContacts => "admin-contacts",
        }
    }
}

/// Outcome of guarding a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Render(View),
    Redirect(Route),
    /// The session check is still running; show a neutral indicator.
    Loading,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Render(view) => write!(f, "render {}", view.name()),
            Decision::Redirect(route) => write!(f, "redirect {}", route),
            Decision::Loading => f.write_str("loading"),
        }
    }
}

/// Decide what to show for `route` given the session status.
pub fn guard(route: &Route, status: SessionStatus) -> Decision {
    if !route.is_protected() {
        return Decision::Render(route.view());
    }
    match status {
        SessionStatus::Authenticated => Decision::Render(route.view()),
        SessionStatus::Loading => Decision::Loading,
        SessionStatus::Anonymous => Decision::Redirect(Route::AdminLogin),
    }
}

/// Guards navigation against the live session.
#[derive(Debug, Clone)]
pub struct Navigator {
    session: Arc<SessionManager>,
}

impl Navigator {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Resolve a path to a decision using the current session status.
    pub fn navigate(&self, path: &str) -> Decision {
        let route = Route::parse(path);
        let status = self.session.status();
        let decision = guard(&route, status);
        tracing::debug!(path, %route, %status, %decision, "Navigated");
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubTransport, token_with_offset};
    use fss_client::{ApiClient, MemoryStorage, Storage};

    #[test]
    fn test_parse_known_paths() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/home"), Route::Home);
        assert_eq!(Route::parse("/about/"), Route::About);
        assert_eq!(Route::parse("/Contact?ref=nav#form"), Route::Contact);
        assert_eq!(Route::parse("/admin"), Route::AdminDashboard);
        assert_eq!(Route::parse("/admin/dashboard"), Route::AdminDashboard);
        assert_eq!(Route::parse("/admin/login"), Route::AdminLogin);
        assert_eq!(
            Route::parse("/services/video-editing"),
            Route::ServiceDetail(ServicePage::VideoEditing)
        );
    }

    #[test]
    fn test_unknown_paths_are_unmatched() {
        assert_eq!(
            Route::parse("/pricing"),
            Route::Unmatched("/pricing".to_string())
        );
        assert_eq!(
            Route::parse("/services/gardening"),
            Route::Unmatched("/services/gardening".to_string())
        );
        assert_eq!(
            guard(&Route::parse("/pricing"), SessionStatus::Anonymous),
            Decision::Render(View::Home)
        );
    }

    #[test]
    fn test_canonical_paths_parse_back() {
        let routes = [
            Route::Home,
            Route::Services,
            Route::ServiceDetail(ServicePage::DigitalMarketing),
            Route::Testimonials,
            Route::AdminUsers,
            Route::AdminContacts,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_guard_matrix() {
        let public = Route::Portfolio;
        let protected = Route::AdminContacts;

        for status in [
            SessionStatus::Loading,
            SessionStatus::Anonymous,
            SessionStatus::Authenticated,
        ] {
            assert_eq!(guard(&public, status), Decision::Render(View::Portfolio));
            assert_eq!(
                guard(&Route::AdminLogin, status),
                Decision::Render(View::AdminLogin)
            );
        }

        assert_eq!(
            guard(&protected, SessionStatus::Authenticated),
            Decision::Render(View::AdminContacts)
        );
        assert_eq!(guard(&protected, SessionStatus::Loading), Decision::Loading);
        assert_eq!(
            guard(&protected, SessionStatus::Anonymous),
            Decision::Redirect(Route::AdminLogin)
        );
    }

    #[test]
    fn test_navigator_follows_session() {
        let storage = std::sync::Arc::new(MemoryStorage::new());
        storage.set("authToken", &token_with_offset(3600)).unwrap();
        let client = ApiClient::builder()
            .storage(storage)
            .transport(StubTransport::new())
            .build()
            .unwrap();
        let navigator = Navigator::new(Arc::new(SessionManager::new(client.clone())));

        assert_eq!(navigator.navigate("/admin"), Decision::Loading);

        navigator.session().initialize();
        assert_eq!(
            navigator.navigate("/admin"),
            Decision::Render(View::AdminDashboard)
        );

        client.end_session();
        assert_eq!(
            navigator.navigate("/admin/users"),
            Decision::Redirect(Route::AdminLogin)
        );
    }
}
