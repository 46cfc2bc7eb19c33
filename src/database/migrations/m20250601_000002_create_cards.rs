use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cards::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cards::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Cards::ManaCost).string_len(100))
                    .col(ColumnDef::new(Cards::Text).text())
                    .col(ColumnDef::new(Cards::Flavor).text())
                    .col(ColumnDef::new(Cards::Type).string_len(100).not_null())
                    .col(ColumnDef::new(Cards::Power).string_len(5).not_null())
                    .col(ColumnDef::new(Cards::Toughness).string_len(5).not_null())
                    .col(ColumnDef::new(Cards::Rarity).string_len(20).not_null())
                    .col(ColumnDef::new(Cards::SetName).string_len(50).not_null())
                    .col(ColumnDef::new(Cards::ImageUrl).string_len(300).not_null())
                    .col(ColumnDef::new(Cards::EditionId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cards_edition_id")
                            .from(Cards::Table, Cards::EditionId)
                            .to(Editions::Table, Editions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CardColors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CardColors::CardId).string().not_null())
                    .col(ColumnDef::new(CardColors::ColorId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(CardColors::CardId)
                            .col(CardColors::ColorId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_card_colors_card_id")
                            .from(CardColors::Table, CardColors::CardId)
                            .to(Cards::Table, Cards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_card_colors_color_id")
                            .from(CardColors::Table, CardColors::ColorId)
                            .to(Colors::Table, Colors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The admin filters cards on these columns
        for (name, column) in [
            ("idx_cards_type", Cards::Type),
            ("idx_cards_rarity", Cards::Rarity),
            ("idx_cards_set_name", Cards::SetName),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Cards::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CardColors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cards::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Cards {
    Table,
    Id,
    Name,
    ManaCost,
    Text,
    Flavor,
    Type,
    Power,
    Toughness,
    Rarity,
    SetName,
    ImageUrl,
    EditionId,
}

#[derive(Iden)]
enum CardColors {
    Table,
    CardId,
    ColorId,
}

#[derive(Iden)]
enum Editions {
    Table,
    Id,
}

#[derive(Iden)]
enum Colors {
    Table,
    Id,
}
