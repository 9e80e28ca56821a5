//! SeaORM-backed repository implementation for the domain port.
//!
//! Polls and their options live in two tables; multi-row writes run in one
//! transaction so a poll is never visible with a partial option set.

use std::collections::HashMap;

use anyhow::Context;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Select, TransactionTrait,
};
use uuid::Uuid;

use crate::contract::model::Poll;
use crate::domain::repo::PollsRepository;
use crate::infra::storage::entity::{poll, poll_option};
use crate::infra::storage::mapper::{options_to_active, poll_from_rows, poll_to_active};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmPollsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmPollsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Run a poll query and attach each poll's options in position order.
    async fn load(&self, query: Select<poll::Entity>) -> anyhow::Result<Vec<Poll>> {
        let polls = query
            .order_by_asc(poll::Column::CreatedAt)
            .order_by_asc(poll::Column::Id)
            .all(&self.conn)
            .await
            .context("poll query failed")?;
        if polls.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = polls.iter().map(|p| p.id).collect();
        let rows = poll_option::Entity::find()
            .filter(poll_option::Column::PollId.is_in(ids))
            .order_by_asc(poll_option::Column::PollId)
            .order_by_asc(poll_option::Column::Position)
            .all(&self.conn)
            .await
            .context("option query failed")?;

        let mut by_poll: HashMap<Uuid, Vec<poll_option::Model>> = HashMap::new();
        for row in rows {
            by_poll.entry(row.poll_id).or_default().push(row);
        }

        Ok(polls
            .into_iter()
            .map(|p| {
                let options = by_poll.remove(&p.id).unwrap_or_default();
                poll_from_rows(p, options)
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl<C> PollsRepository for SeaOrmPollsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Poll>> {
        let found = self
            .load(poll::Entity::find_by_id(id))
            .await
            .context("find_by_id failed")?;
        Ok(found.into_iter().next())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Poll>> {
        self.load(poll::Entity::find())
            .await
            .context("list_all failed")
    }

    async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Poll>> {
        self.load(poll::Entity::find().filter(poll::Column::CreatedBy.eq(owner)))
            .await
            .context("list_by_owner failed")
    }

    async fn insert(&self, p: Poll) -> anyhow::Result<()> {
        let txn = self.conn.begin().await.context("begin failed")?;
        poll_to_active(&p)
            .insert(&txn)
            .await
            .context("insert poll failed")?;
        poll_option::Entity::insert_many(options_to_active(p.id, &p.options))
            .exec(&txn)
            .await
            .context("insert options failed")?;
        txn.commit().await.context("commit failed")?;
        Ok(())
    }

    async fn update(&self, p: Poll, replace_options: bool) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await.context("begin failed")?;
        match poll_to_active(&p).update(&txn).await {
            Ok(_) => {}
            // Row deleted since it was read; dropping `txn` rolls back.
            Err(DbErr::RecordNotUpdated) => return Ok(false),
            Err(e) => return Err(anyhow::Error::new(e).context("update poll failed")),
        }
        if replace_options {
            poll_option::Entity::delete_many()
                .filter(poll_option::Column::PollId.eq(p.id))
                .exec(&txn)
                .await
                .context("delete old options failed")?;
            poll_option::Entity::insert_many(options_to_active(p.id, &p.options))
                .exec(&txn)
                .await
                .context("insert new options failed")?;
        }
        txn.commit().await.context("commit failed")?;
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await.context("begin failed")?;
        poll_option::Entity::delete_many()
            .filter(poll_option::Column::PollId.eq(id))
            .exec(&txn)
            .await
            .context("delete options failed")?;
        let res = poll::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("delete poll failed")?;
        txn.commit().await.context("commit failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn increment_vote(&self, poll_id: Uuid, option_id: Uuid) -> anyhow::Result<bool> {
        // Single UPDATE; concurrent voters never overwrite each other's counts.
        let res = poll_option::Entity::update_many()
            .col_expr(
                poll_option::Column::Votes,
                Expr::col(poll_option::Column::Votes).add(1),
            )
            .filter(poll_option::Column::Id.eq(option_id))
            .filter(poll_option::Column::PollId.eq(poll_id))
            .exec(&self.conn)
            .await
            .context("increment_vote failed")?;
        Ok(res.rows_affected > 0)
    }
}
