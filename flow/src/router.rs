//! Branch selection from the classifier output

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::state::PlannerOutput;

/// The content-generation branch chosen for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    TextOnly,
    ImageOnly,
    TextWithImage,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::TextOnly, Route::ImageOnly, Route::TextWithImage];

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::TextOnly => "text_only",
            Route::ImageOnly => "image_only",
            Route::TextWithImage => "text_with_image",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown content type: {0}")]
pub struct UnknownRoute(pub String);

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::ALL
            .into_iter()
            .find(|route| route.as_str() == s)
            .ok_or_else(|| UnknownRoute(s.to_string()))
    }
}

/// Pick the branch for a classifier result.
///
/// Returns `None` when there is no classifier output, no `content_type`,
/// or a value that names no branch.
pub fn route(planner_output: Option<&PlannerOutput>) -> Option<Route> {
    let Some(planner_output) = planner_output else {
        tracing::error!("Error in routing: no classifier output");
        return None;
    };

    let Some(content_type) = planner_output.content_type.as_deref() else {
        tracing::error!("Error in routing: classifier output has no content_type");
        return None;
    };

    match content_type.parse::<Route>() {
        Ok(route) => Some(route),
        Err(e) => {
            tracing::error!("Error in routing: {}", e);
            None
        }
    }
}
