pub mod core {
    pub mod ports;
    pub mod session;
    pub mod entities {
        pub mod amount;
        pub mod date;
        pub mod earnings;
        pub mod expense;
        pub mod hotel;
        pub mod id;
        pub mod project;
        pub mod receipt;
        pub mod time_entry;
        pub mod user;
    }
    pub mod week {
        pub mod calendar;
        pub mod project_ordering;
        pub mod summary;
    }
}

pub mod application {
    pub mod config;
    pub mod errors;
    pub mod http_client;
    pub mod query;
    pub mod facades {
        pub mod admin;
        pub mod api;
        pub mod auth;
        pub mod earnings;
        pub mod entity;
        pub mod expenses;
        pub mod payroll;
        pub mod payslips;
        pub mod receipts;
    }
    pub mod forms {
        pub mod expense_form;
        pub mod hotel_form;
        pub mod profile_form;
        pub mod project_form;
        pub mod status;
        pub mod time_entry_form;
        pub mod user_form;
    }
    pub mod pages {
        pub mod admin;
        pub mod earnings;
        pub mod expenses;
        pub mod hotels;
        pub mod owned_records;
        pub mod projects;
        pub mod receipts;
        pub mod week_view;
    }
    pub mod transfer {
        pub mod csv;
        pub mod export;
        pub mod import;
        pub mod kind;
    }
}

pub mod adapters {
    pub mod in_memory {
        pub mod in_memory_backend;
        pub mod in_memory_token_store;
    }
    pub mod file {
        pub mod file_token_store;
    }
    pub mod reqwest {
        pub mod reqwest_transport;
    }
}

#[cfg(test)]
pub mod test_support {
    pub mod fixtures {
        pub mod entities;
    }
}
