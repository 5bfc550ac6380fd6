pub mod mysql {

    pub const DEFAULT_HOST: &str = "localhost";

    pub const DEFAULT_ENDPOINT: &str = "localhost:3306";
}

pub mod env {

    pub const ENDPOINT: &str = "MYSQL_ENDPOINT";

    pub const USERNAME: &str = "MYSQL_USERNAME";

    pub const PASSWORD: &str = "MYSQL_PASSWORD";
}

pub mod metrics {

    pub const STATEMENTS_TOTAL: &str = "mysql_user_statements_total";
}
