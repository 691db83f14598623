#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    /// Sales tax rate applied when deriving invoices, e.g. 0.0825.
    pub tax_rate: f64,
    /// Days until a freshly generated invoice falls due.
    pub invoice_due_days: i64,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let jwt_maxage = std::env::var("JWT_MAXAGE").expect("JWT_MAXAGE must be set");

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .expect("PORT must be a number");

        let tax_rate = std::env::var("TAX_RATE")
            .unwrap_or_else(|_| "0.0825".to_string())
            .parse::<f64>()
            .expect("TAX_RATE must be a number");

        let invoice_due_days = std::env::var("INVOICE_DUE_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<i64>()
            .expect("INVOICE_DUE_DAYS must be a number");

        Config {
            database_url,
            jwt_secret,
            jwt_maxage: jwt_maxage.parse::<i64>().unwrap(),
            port,
            tax_rate,
            invoice_due_days,
        }
    }
}
