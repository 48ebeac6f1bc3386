pub mod departments;
pub mod events;
pub mod organizers;
pub mod registrations;
pub mod sponsors;
pub mod students;
