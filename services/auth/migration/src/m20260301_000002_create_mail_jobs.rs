use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MailJobs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MailJobs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(MailJobs::Template).string().not_null())
                    .col(ColumnDef::new(MailJobs::Recipient).string().not_null())
                    .col(ColumnDef::new(MailJobs::Payload).json_binary().not_null())
                    .col(
                        ColumnDef::new(MailJobs::Attempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(MailJobs::LastError).string())
                    .col(
                        ColumnDef::new(MailJobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MailJobs::NextAttemptAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MailJobs::SentAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(MailJobs::FailedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Worker polls pending jobs ordered by next_attempt_at.
        manager
            .create_index(
                Index::create()
                    .table(MailJobs::Table)
                    .col(MailJobs::NextAttemptAt)
                    .name("idx_mail_jobs_next_attempt_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MailJobs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MailJobs {
    Table,
    Id,
    Template,
    Recipient,
    Payload,
    Attempts,
    LastError,
    CreatedAt,
    NextAttemptAt,
    SentAt,
    FailedAt,
}
