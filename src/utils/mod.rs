pub mod db_utils;
pub mod key_lock;
