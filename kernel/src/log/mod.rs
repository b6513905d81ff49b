//! Badge Logging Subsystem

pub mod logger;

pub use logger::{
    Console, Logger,
    init as init_logger,
    try_get_logger,
    log_info, log_warn, log_err, log_dbg, log_fatal,
    enter_panic_mode
};
