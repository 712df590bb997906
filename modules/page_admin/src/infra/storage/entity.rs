//! SeaORM entities for database tables

/// Page tree table
pub mod page {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "pages")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,

        /// Parent page, NULL for root pages
        pub parent_id: Option<i64>,

        /// Ordering among siblings
        pub position: i32,

        /// Depth in the tree
        pub level: i32,

        pub author: Option<String>,

        /// Status code (draft, published, expired, hidden)
        pub status: i16,

        pub template: Option<String>,

        pub freeze_date: Option<DateTimeUtc>,
        pub publication_date: Option<DateTimeUtc>,
        pub publication_end_date: Option<DateTimeUtc>,

        /// Site ids as a JSON array
        pub sites: Json,

        /// Tags as a JSON array
        pub tags: Json,

        pub delegate_to: Option<String>,
        pub redirect_to: Option<i64>,
        pub redirect_to_url: Option<String>,

        pub creation_date: DateTimeUtc,
        pub last_modification_date: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::content::Entity")]
        Contents,
        #[sea_orm(has_many = "super::alias::Entity")]
        Aliases,
    }

    impl Related<super::content::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Contents.def()
        }
    }

    impl Related<super::alias::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Aliases.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Versioned placeholder content table
pub mod content {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "page_contents")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,

        pub page_id: i64,

        pub language: String,

        /// Placeholder name
        pub slot: String,

        #[sea_orm(column_type = "Text")]
        pub body: String,

        /// Version per (page, language, slot), starting at 1
        pub version: i32,

        pub creation_date: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::page::Entity",
            from = "Column::PageId",
            to = "super::page::Column::Id"
        )]
        Page,
    }

    impl Related<super::page::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Page.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Page alias table
pub mod alias {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "page_aliases")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,

        pub page_id: i64,

        #[sea_orm(unique)]
        pub url: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::page::Entity",
            from = "Column::PageId",
            to = "super::page::Column::Id"
        )]
        Page,
    }

    impl Related<super::page::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Page.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
