use sqlx::{PgConnection, PgPool};

use crate::{
    error::Result,
    models::{Address, AddressChanges, NewAddress},
};

pub async fn list_addresses(pool: &PgPool, user_id: i32) -> Result<Vec<Address>> {
    let addresses = sqlx::query_as::<_, Address>(
        "SELECT * FROM user_addresses WHERE user_id = $1 ORDER BY is_default DESC, created_at ASC, id ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(addresses)
}

// The partial unique index allows one default per user, so the old default is
// cleared in its own statement before a new one is written.
async fn clear_default(conn: &mut PgConnection, user_id: i32) -> Result<()> {
    sqlx::query("UPDATE user_addresses SET is_default = FALSE WHERE user_id = $1 AND is_default")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

pub async fn create_address(pool: &PgPool, user_id: i32, new: &NewAddress) -> Result<Vec<Address>> {
    let mut tx = pool.begin().await?;

    if new.is_default {
        clear_default(&mut *tx, user_id).await?;
    }

    sqlx::query(
        r#"
        INSERT INTO user_addresses (user_id, full_name, phone, street, city, state, zip_code, is_default)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(user_id)
    .bind(&new.address.full_name)
    .bind(&new.address.phone)
    .bind(&new.address.street)
    .bind(&new.address.city)
    .bind(&new.address.state)
    .bind(&new.address.zip_code)
    .bind(new.is_default)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    list_addresses(pool, user_id).await
}

/// Returns `None` when the address does not belong to the user.
pub async fn update_address(
    pool: &PgPool,
    user_id: i32,
    id: i32,
    changes: &AddressChanges,
) -> Result<Option<Vec<Address>>> {
    let mut tx = pool.begin().await?;

    if changes.is_default == Some(true) {
        clear_default(&mut *tx, user_id).await?;
    }

    let updated = sqlx::query(
        r#"
        UPDATE user_addresses
        SET
            full_name = COALESCE($1, full_name),
            phone = COALESCE($2, phone),
            street = COALESCE($3, street),
            city = COALESCE($4, city),
            state = COALESCE($5, state),
            zip_code = COALESCE($6, zip_code),
            is_default = COALESCE($7, is_default)
        WHERE id = $8 AND user_id = $9
        "#,
    )
    .bind(&changes.full_name)
    .bind(&changes.phone)
    .bind(&changes.street)
    .bind(&changes.city)
    .bind(&changes.state)
    .bind(&changes.zip_code)
    .bind(changes.is_default)
    .bind(id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(None);
    }

    tx.commit().await?;

    Ok(Some(list_addresses(pool, user_id).await?))
}

pub async fn delete_address(pool: &PgPool, user_id: i32, id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM user_addresses WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn set_default(pool: &PgPool, user_id: i32, id: i32) -> Result<Option<Vec<Address>>> {
    let mut tx = pool.begin().await?;

    clear_default(&mut *tx, user_id).await?;

    let updated = sqlx::query(
        "UPDATE user_addresses SET is_default = TRUE WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(None);
    }

    tx.commit().await?;

    Ok(Some(list_addresses(pool, user_id).await?))
}
