use sea_orm_migration::{prelude::*, schema::*};

use crate::iden::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create Department Table
        let table = table_auto(Department::Table)
            .col(pk_auto(Department::DepartmentId))
            .col(string(Department::DeptName))
            .to_owned();
        manager.create_table(table).await?;

        // Create Sponsor Table
        let table = table_auto(Sponsor::Table)
            .col(pk_auto(Sponsor::SponsorId))
            .col(string(Sponsor::Name))
            .to_owned();
        manager.create_table(table).await?;

        // Create Student Table
        let table = table_auto(Student::Table)
            .col(pk_auto(Student::StudentId))
            .col(string_uniq(Student::SupabaseId))
            .col(string(Student::FirstName))
            .col(string(Student::LastName))
            .col(string(Student::Email))
            .col(string(Student::Phone))
            .col(integer_null(Student::Year))
            .col(integer_null(Student::DepartmentId))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_student_department")
                    .from(Student::Table, Student::DepartmentId)
                    .to(Department::Table, Department::DepartmentId)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .to_owned();
        manager.create_table(table).await?;

        // Create Event Table
        let table = table_auto(Event::Table)
            .col(pk_auto(Event::EventId))
            .col(string(Event::EventName))
            .col(string(Event::Description))
            .col(date(Event::Date))
            .col(time(Event::Time))
            .col(string(Event::Venue))
            .col(integer(Event::DepartmentId))
            .col(integer_null(Event::SponsorId))
            .col(integer(Event::MaxParticipants))
            .col(decimal_len(Event::RegistrationFee, 10, 2))
            .col(string(Event::EventType))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_event_department")
                    .from(Event::Table, Event::DepartmentId)
                    .to(Department::Table, Department::DepartmentId)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_event_sponsor")
                    .from(Event::Table, Event::SponsorId)
                    .to(Sponsor::Table, Sponsor::SponsorId)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .to_owned();
        manager.create_table(table).await?;

        // Create Registration Table
        let table = table_auto(Registration::Table)
            .col(pk_auto(Registration::RegistrationId))
            .col(integer(Registration::EventId))
            .col(integer(Registration::StudentId))
            .col(timestamp(Registration::RegistrationDate).default(Expr::current_timestamp()))
            .col(string(Registration::PaymentStatus).default("Pending"))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_registration_event")
                    .from(Registration::Table, Registration::EventId)
                    .to(Event::Table, Event::EventId)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_registration_student")
                    .from(Registration::Table, Registration::StudentId)
                    .to(Student::Table, Student::StudentId)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        manager.create_table(table).await?;

        // Create Organizer Table
        let table = table_auto(Organizer::Table)
            .col(pk_auto(Organizer::OrganizerId))
            .col(string_uniq(Organizer::Email))
            .col(string(Organizer::PasswordHash))
            .col(integer(Organizer::DepartmentId))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_organizer_department")
                    .from(Organizer::Table, Organizer::DepartmentId)
                    .to(Department::Table, Department::DepartmentId)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        manager.create_table(table).await?;

        // Create indices for common lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_registration_event_student")
                    .table(Registration::Table)
                    .col(Registration::EventId)
                    .col(Registration::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_registration_student")
                    .table(Registration::Table)
                    .col(Registration::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_department")
                    .table(Event::Table)
                    .col(Event::DepartmentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop all tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(Registration::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Organizer::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Event::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Student::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Sponsor::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Department::Table).to_owned())
            .await?;

        Ok(())
    }
}
