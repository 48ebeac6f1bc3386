pub use super::department::Entity as Department;
pub use super::event::Entity as Event;
pub use super::organizer::Entity as Organizer;
pub use super::organizer_session::Entity as OrganizerSession;
pub use super::registration::Entity as Registration;
pub use super::sponsor::Entity as Sponsor;
pub use super::student::Entity as Student;
