//! Recurring-task tracker on top of a generated data-access module.
//!
//! `build.rs` extracts `schema.sql` and generates [`sql`] at build time; the
//! [`tasks`] functions are thin wrappers over the generated inserts, replaces
//! and deletes.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use sqlgen_demo::sql;
//! use sqlgen_demo::tasks::{self, NewTask};
//! use sqlgen_runtime::Db;
//!
//! let db = Db::open_in_memory().unwrap();
//! db.initialize(sql::CREATE_TABLE).unwrap();
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! tasks::add_tasks(&db, &[NewTask::new("water plants", start).every(3)]).unwrap();
//!
//! let all = tasks::fetch_tasks(&db).unwrap();
//! assert_eq!(all[0].name, "water plants");
//! assert_eq!(all[0].done_at, None);
//! ```

pub mod sql {
    //! Module generated from `schema.sql`.
    include!(concat!(env!("OUT_DIR"), "/sql.rs"));
}

pub mod tasks;
