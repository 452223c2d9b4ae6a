//! Administrative region table.
//!
//! Only the columns read by the lookups are mapped. The physical table also
//! carries an `is_deleted` flag, which every query filters on but never
//! selects. The table name is configurable at runtime, so queries are issued
//! as raw statements and decoded into [`Model`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "region_table")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub parent_id: Option<i64>,
    pub region_name: String,
    pub region_type: i32,
    pub alias_name: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
