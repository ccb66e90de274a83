use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_draws: u32,
    pub picking_seconds: u32,
    pub draw_interval_ms: u64,
    pub autosave_seconds: u64,
    pub starting_balance: u32,
    pub ambient_crowd: bool,
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("Invalid PORT"),
            max_draws: env::var("MAX_DRAWS")
                .unwrap_or_else(|_| "75".to_string())
                .parse()
                .expect("Invalid MAX_DRAWS"),
            picking_seconds: env::var("PICKING_SECONDS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("Invalid PICKING_SECONDS"),
            draw_interval_ms: env::var("DRAW_INTERVAL_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .expect("Invalid DRAW_INTERVAL_MS"),
            autosave_seconds: env::var("AUTOSAVE_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("Invalid AUTOSAVE_SECONDS"),
            starting_balance: env::var("STARTING_BALANCE")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .expect("Invalid STARTING_BALANCE"),
            ambient_crowd: env::var("AMBIENT_CROWD")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .expect("Invalid AMBIENT_CROWD"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
