pub mod client;
pub mod fill_state;
pub mod installation_count;
pub mod realm;
pub mod realm_count;
pub mod stream;
pub mod stream_count;
pub mod user_count;
pub mod user_profile;

pub use client::Entity as ClientEntity;
pub use fill_state::Entity as FillStateEntity;
pub use installation_count::Entity as InstallationCountEntity;
pub use realm::Entity as RealmEntity;
pub use realm_count::Entity as RealmCountEntity;
pub use stream::Entity as StreamEntity;
pub use stream_count::Entity as StreamCountEntity;
pub use user_count::Entity as UserCountEntity;
pub use user_profile::Entity as UserProfileEntity;
