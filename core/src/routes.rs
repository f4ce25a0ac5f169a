//! Static route table and the navigation hook that keeps the document title
//! in sync.

use std::fmt;

const SITE: &str = "Orange Jobs";

/// Views the front end can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    JobList,
    JobDetail,
    Analysis,
    NotFound,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Home => write!(f, "Home"),
            View::JobList => write!(f, "JobList"),
            View::JobDetail => write!(f, "JobDetail"),
            View::Analysis => write!(f, "Analysis"),
            View::NotFound => write!(f, "NotFound"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Pattern with `:name` segments, or `*` for the catch-all.
    pub path: &'static str,
    pub view: View,
    pub title: &'static str,
}

/// Declaration order is match order; the catch-all goes last.
pub const ROUTES: &[Route] = &[
    Route {
        path: "/",
        view: View::Home,
        title: "Home - Orange Jobs",
    },
    Route {
        path: "/jobs",
        view: View::JobList,
        title: "Job Listings - Orange Jobs",
    },
    Route {
        path: "/jobs/:id",
        view: View::JobDetail,
        title: "Job Details - Orange Jobs",
    },
    Route {
        path: "/analysis",
        view: View::Analysis,
        title: "Analytics - Orange Jobs",
    },
    Route {
        path: "*",
        view: View::NotFound,
        title: "Page Not Found - Orange Jobs",
    },
];

/// A route matched against a concrete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matched {
    pub route: &'static Route,
    pub params: Vec<(&'static str, String)>,
}

impl Matched {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Resolve `path` (query string and fragment ignored) to a route.
pub fn resolve(path: &str) -> Matched {
    let path = path.split(|c: char| c == '?' || c == '#').next().unwrap_or("");
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    for route in ROUTES {
        if route.path == "*" {
            return Matched {
                route,
                params: Vec::new(),
            };
        }
        if let Some(params) = match_pattern(route.path, &segments) {
            return Matched { route, params };
        }
    }
    Matched {
        route: &ROUTES[ROUTES.len() - 1],
        params: Vec::new(),
    }
}

fn match_pattern(pattern: &'static str, segments: &[&str]) -> Option<Vec<(&'static str, String)>> {
    let parts: Vec<&'static str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    if parts.len() != segments.len() {
        return None;
    }
    let mut params = Vec::new();
    for (part, segment) in parts.into_iter().zip(segments) {
        match part.strip_prefix(':') {
            Some(name) => params.push((name, segment.to_string())),
            None if part == *segment => {}
            None => return None,
        }
    }
    Some(params)
}

type Hook = Box<dyn Fn(&Matched) + Send + Sync>;

/// Navigation state: the current match and the document title.
///
/// Every `navigate` runs the built-in title hook, then any hooks added with
/// `before_each`. Hooks cannot cancel navigation.
pub struct Router {
    current: Matched,
    title: String,
    hooks: Vec<Hook>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            current: resolve("/"),
            title: SITE.to_string(),
            hooks: Vec::new(),
        }
    }

    pub fn before_each<F>(&mut self, hook: F)
    where
        F: Fn(&Matched) + Send + Sync + 'static,
    {
        self.hooks.push(Box::new(hook));
    }

    pub fn navigate(&mut self, path: &str) -> &Matched {
        let matched = resolve(path);
        if !matched.route.title.is_empty() {
            self.title = matched.route.title.to_string();
        }
        for hook in &self.hooks {
            hook(&matched);
        }
        tracing::debug!(path, view = %matched.route.view, "navigated");
        self.current = matched;
        &self.current
    }

    pub fn current(&self) -> &Matched {
        &self.current
    }

    /// The document title as last set by navigation.
    pub fn title(&self) -> &str {
        &self.title
    }
}
