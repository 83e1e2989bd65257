pub mod core {
    pub mod config;
    pub mod error;
    pub mod routes;
    pub mod state;
    pub mod tracing_init;
}

pub mod models {
    pub mod sweet;
    pub mod user;
}

pub mod stores {
    pub mod sweet_store;
    pub mod user_store;
}

pub mod auth {
    pub mod gate;
    pub mod token;
}

pub mod search {
    pub mod filter;
}

pub mod validation {
    pub mod input;
}

pub mod handlers {
    pub mod auth;
    pub mod fallback;
    pub mod health;
    pub mod sweets;
}
