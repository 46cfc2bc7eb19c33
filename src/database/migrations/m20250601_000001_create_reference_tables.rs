use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Colors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Colors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Colors::Name).string_len(20).not_null())
                    .col(ColumnDef::new(Colors::Code).string_len(3).not_null())
                    .to_owned(),
            )
            .await?;

        // Edition codes are unique by convention only
        manager
            .create_table(
                Table::create()
                    .table(Editions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Editions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Editions::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Editions::Code).string_len(3).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_editions_name")
                    .table(Editions::Table)
                    .col(Editions::Name)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Editions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Colors::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Colors {
    Table,
    Id,
    Name,
    Code,
}

#[derive(Iden)]
enum Editions {
    Table,
    Id,
    Name,
    Code,
}
