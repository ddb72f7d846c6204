//! Turn-by-turn navigation links for the station labels.

use crate::geo::Coordinates;

/// Client platform, as far as navigation links are concerned.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum Platform {
    Android,
    Ios,

    #[default]
    Other,
}

impl Platform {
    /// Classify a browser user agent. Android takes precedence over the Apple device names.
    #[must_use]
    pub fn from_user_agent(user_agent: &str) -> Self {
        if user_agent.contains("Android") {
            Self::Android
        } else if ["iPhone", "iPad", "iPod"].iter().any(|device| user_agent.contains(device)) {
            Self::Ios
        } else {
            Self::Other
        }
    }
}

#[must_use]
#[derive(Clone, Debug, Eq, Hash, PartialEq, derive_more::Display)]
pub struct NavigationLink(String);

impl NavigationLink {
    pub fn resolve(coordinates: Coordinates, platform: Platform) -> Self {
        let Coordinates { latitude, longitude } = coordinates;
        Self(match platform {
            Platform::Android => format!("google.navigation:q={latitude},{longitude}"),
            Platform::Ios => format!("http://maps.apple.com/?daddr={latitude},{longitude}&dirflg=d"),
            Platform::Other => format!("https://www.google.com/maps/?q=@{latitude},{longitude}"),
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
