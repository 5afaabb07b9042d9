pub mod address;
pub mod catalog;

pub use self::{address::SubnetPool, catalog::Location};

use rand::{Rng, seq::IndexedRandom as _};

/// Browser-facing identity of one simulated hit.
///
/// Each field is drawn independently from its catalog, so a persona is
/// combinatorially diverse rather than fully coherent (a Tokyo visitor may
/// well carry a German accept-language). That trade-off is intentional.
#[derive(Debug, Clone, Copy)]
pub struct Persona {
    pub user_agent: &'static str,
    pub accept_language: &'static str,
    pub referer: &'static str,
    pub location: &'static Location,
}

/// Draws a persona. `desktop_share` is a percentage: a uniform draw in
/// [0,100) below it selects from the desktop user-agent catalog, anything
/// else goes mobile, realizing the split in expectation per call.
pub fn persona(desktop_share: f64, rng: &mut impl Rng) -> Persona {
    let agents = if rng.random_range(0.0..100.0) < desktop_share {
        catalog::DESKTOP_USER_AGENTS
    } else {
        catalog::MOBILE_USER_AGENTS
    };

    Persona {
        user_agent: *agents.choose(rng).expect("user agent catalogs are never empty"),
        accept_language: *catalog::ACCEPT_LANGUAGES
            .choose(rng)
            .expect("accept-language catalog is never empty"),
        referer: *catalog::REFERERS
            .choose(rng)
            .expect("referer catalog is never empty"),
        location: catalog::LOCATIONS
            .choose(rng)
            .expect("location catalog is never empty"),
    }
}
