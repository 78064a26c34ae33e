use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub redis_url: String,

    pub jwt_secret: String,
    pub jwt_expires_in: String,
    pub jwt_maxage: i32,

    pub client_origin: String,
    pub port: u16,
}

impl Config {
    pub fn init() -> Config {
        let mongodb_uri = std::env::var("MONGODB_URI")
            .expect("MONGODB_URI must be set");
        let mongodb_database = std::env::var("MONGODB_DATABASE")
            .unwrap_or_else(|_| "pharma_inventory".to_owned());

        let redis_url = std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_owned());

        let jwt_secret = std::env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");
        let jwt_expires_in = std::env::var("JWT_EXPIRED_IN")
            .unwrap_or_else(|_| "60m".to_owned());
        let jwt_maxage = std::env::var("JWT_MAXAGE")
            .unwrap_or_else(|_| "60".to_owned())
            .parse::<i32>()
            .expect("JWT_MAXAGE must be a number");

        let client_origin = std::env::var("CLIENT_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_owned())
            .parse::<u16>()
            .expect("PORT must be a number");

        Config {
            mongodb_uri,
            mongodb_database,
            redis_url,
            jwt_secret,
            jwt_expires_in,
            jwt_maxage,
            client_origin,
            port,
        }
    }
}
