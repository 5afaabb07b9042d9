/// Geographic point a synthetic visitor appears to browse from.
///
/// City and region names are kept plain ASCII: the values travel in HTTP
/// headers, which cannot carry anything outside visible ASCII plus space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub country_code: &'static str,
    pub region: &'static str,
    pub city: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

pub static LOCATIONS: &[Location] = &[
    Location {
        country_code: "US",
        region: "New York",
        city: "New York",
        latitude: 40.7128,
        longitude: -74.0060,
    },
    Location {
        country_code: "US",
        region: "California",
        city: "Los Angeles",
        latitude: 34.0522,
        longitude: -118.2437,
    },
    Location {
        country_code: "US",
        region: "Illinois",
        city: "Chicago",
        latitude: 41.8781,
        longitude: -87.6298,
    },
    Location {
        country_code: "CA",
        region: "Ontario",
        city: "Toronto",
        latitude: 43.6532,
        longitude: -79.3832,
    },
    Location {
        country_code: "GB",
        region: "England",
        city: "London",
        latitude: 51.5074,
        longitude: -0.1278,
    },
    Location {
        country_code: "DE",
        region: "Berlin",
        city: "Berlin",
        latitude: 52.5200,
        longitude: 13.4050,
    },
    Location {
        country_code: "FR",
        region: "Ile-de-France",
        city: "Paris",
        latitude: 48.8566,
        longitude: 2.3522,
    },
    Location {
        country_code: "ES",
        region: "Madrid",
        city: "Madrid",
        latitude: 40.4168,
        longitude: -3.7038,
    },
    Location {
        country_code: "IT",
        region: "Lazio",
        city: "Rome",
        latitude: 41.9028,
        longitude: 12.4964,
    },
    Location {
        country_code: "NL",
        region: "North Holland",
        city: "Amsterdam",
        latitude: 52.3676,
        longitude: 4.9041,
    },
    Location {
        country_code: "SE",
        region: "Stockholm",
        city: "Stockholm",
        latitude: 59.3293,
        longitude: 18.0686,
    },
    Location {
        country_code: "PL",
        region: "Masovia",
        city: "Warsaw",
        latitude: 52.2297,
        longitude: 21.0122,
    },
    Location {
        country_code: "BR",
        region: "Sao Paulo",
        city: "Sao Paulo",
        latitude: -23.5505,
        longitude: -46.6333,
    },
    Location {
        country_code: "MX",
        region: "Mexico City",
        city: "Mexico City",
        latitude: 19.4326,
        longitude: -99.1332,
    },
    Location {
        country_code: "AU",
        region: "New South Wales",
        city: "Sydney",
        latitude: -33.8688,
        longitude: 151.2093,
    },
    Location {
        country_code: "JP",
        region: "Tokyo",
        city: "Tokyo",
        latitude: 35.6762,
        longitude: 139.6503,
    },
    Location {
        country_code: "IN",
        region: "Maharashtra",
        city: "Mumbai",
        latitude: 19.0760,
        longitude: 72.8777,
    },
    Location {
        country_code: "SG",
        region: "Singapore",
        city: "Singapore",
        latitude: 1.3521,
        longitude: 103.8198,
    },
];

pub static DESKTOP_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36 Edg/125.0.2535.67",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:127.0) Gecko/20100101 Firefox/127.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:126.0) Gecko/20100101 Firefox/126.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:127.0) Gecko/20100101 Firefox/127.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 OPR/110.0.0.0",
];

pub static MOBILE_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) CriOS/126.0.6478.54 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (Linux; Android 14; SM-S921B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (Linux; Android 13; SM-A536B) AppleWebKit/537.36 (KHTML, like Gecko) SamsungBrowser/25.0 Chrome/121.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (Linux; Android 14; moto g84 5G) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (Android 14; Mobile; rv:127.0) Gecko/127.0 Firefox/127.0",
    "Mozilla/5.0 (iPad; CPU OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1",
];

pub static ACCEPT_LANGUAGES: &[&str] = &[
    "en-US,en;q=0.9",
    "en-GB,en;q=0.9",
    "en-US,en;q=0.8,es;q=0.6",
    "de-DE,de;q=0.9,en;q=0.7",
    "fr-FR,fr;q=0.9,en;q=0.6",
    "es-ES,es;q=0.9,en;q=0.5",
    "it-IT,it;q=0.9,en;q=0.6",
    "nl-NL,nl;q=0.9,en;q=0.7",
    "sv-SE,sv;q=0.9,en;q=0.7",
    "pl-PL,pl;q=0.9,en;q=0.6",
    "pt-BR,pt;q=0.9,en;q=0.5",
    "ja-JP,ja;q=0.9,en;q=0.4",
];

pub static REFERERS: &[&str] = &[
    "https://www.google.com/",
    "https://www.google.com/search?q=",
    "https://www.bing.com/search",
    "https://duckduckgo.com/",
    "https://www.facebook.com/",
    "https://x.com/",
    "https://t.co/",
    "https://www.reddit.com/",
    "https://www.instagram.com/",
    "https://www.linkedin.com/feed/",
    "https://www.youtube.com/",
    "https://news.ycombinator.com/",
];

/// First octets that plausibly route to consumer networks of the country.
/// Unmapped countries draw from [`DEFAULT_FIRST_OCTETS`].
pub fn first_octet_pool(country_code: &str) -> &'static [u8] {
    match country_code {
        "US" => &[3, 4, 8, 13, 23, 24, 32, 63, 66, 98],
        "CA" => &[24, 47, 70, 99, 142, 184],
        "GB" => &[25, 51, 62, 78, 81, 86, 90],
        "DE" => &[46, 77, 79, 84, 87, 91],
        "FR" => &[62, 77, 78, 80, 90, 93],
        "ES" => &[77, 79, 81, 83, 88],
        "IT" => &[79, 82, 87, 93, 95],
        "NL" => &[62, 77, 82, 84, 94],
        "SE" => &[78, 81, 83, 90, 94],
        "PL" => &[31, 77, 83, 89, 91],
        "BR" => &[138, 152, 168, 177, 179, 187, 189],
        "MX" => &[131, 148, 187, 189, 201],
        "AU" => &[1, 14, 27, 49, 58, 101],
        "JP" => &[27, 36, 58, 60, 111, 118, 126],
        "IN" => &[27, 43, 49, 59, 106, 117],
        "SG" => &[8, 27, 101, 116, 119],
        _ => DEFAULT_FIRST_OCTETS,
    }
}

pub static DEFAULT_FIRST_OCTETS: &[u8] = &[5, 31, 37, 46, 62, 77, 78, 80, 85, 89, 91, 94];
