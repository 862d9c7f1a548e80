pub mod ip_log;

pub use ip_log::Entity as IpLogEntity;
