use sea_orm_migration::prelude::*;

// Define table names
#[derive(DeriveIden)]
pub enum Department {
    Table,
    DepartmentId,
    DeptName,
}

#[derive(DeriveIden)]
pub enum Sponsor {
    Table,
    SponsorId,
    Name,
}

#[derive(DeriveIden)]
pub enum Student {
    Table,
    StudentId,
    SupabaseId,
    FirstName,
    LastName,
    Email,
    Phone,
    Year,
    DepartmentId,
}

#[derive(DeriveIden)]
pub enum Event {
    Table,
    EventId,
    EventName,
    Description,
    Date,
    Time,
    Venue,
    DepartmentId,
    SponsorId,
    MaxParticipants,
    RegistrationFee,
    EventType,
}

#[derive(DeriveIden)]
pub enum Registration {
    Table,
    RegistrationId,
    EventId,
    StudentId,
    RegistrationDate,
    PaymentStatus,
}

#[derive(DeriveIden)]
pub enum Organizer {
    Table,
    OrganizerId,
    Email,
    PasswordHash,
    DepartmentId,
}

#[derive(DeriveIden)]
pub enum OrganizerSession {
    Table,
    Id,
    OrganizerId,
    Token,
    ExpiresAt,
}
