//! Bill repository implementation
//!
//! Bills are stored flat in the `bills` table, one column per slot field
//! (`name1`, `amount1`, `tax1`, ... `typerefer4`). The repository maps that
//! layout to and from [`BillContent`]; it does not interpret bill numbers.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{FromRow, PgPool, Postgres, Row};

use domain_billing::{BillContent, NewBill, EXTENSION_SLOTS, LINE_ITEM_SLOTS};

use crate::error::DatabaseError;

/// Per-slot column stems, suffixed with the slot number
const SLOT_FIELDS: [&str; 8] = [
    "name",
    "amount",
    "tax",
    "taxgo",
    "check",
    "car_registration",
    "refer",
    "typerefer",
];

/// Content columns in bind order
static CONTENT_COLUMNS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut columns = vec!["username".to_string(), "phone".to_string()];
    for slot in 1..=LINE_ITEM_SLOTS {
        columns.extend(SLOT_FIELDS.iter().map(|field| format!("{}{}", field, slot)));
    }
    for slot in 1..=EXTENSION_SLOTS {
        columns.push(format!("extension{}_type", slot));
        columns.push(format!("extension{}_amount", slot));
    }
    columns.push("payment_method".to_string());
    columns.push("description".to_string());
    columns
});

static SELECT_COLUMNS: Lazy<String> = Lazy::new(|| {
    format!(
        "id, bill_prefix, bill_seq, bill_number, {}, total, bill_date, created_by, created_at, updated_at",
        CONTENT_COLUMNS.join(", ")
    )
});

static INSERT_SQL: Lazy<String> = Lazy::new(|| {
    // bill_prefix, bill_seq, bill_number, content..., total, bill_date, created_by, created_at, updated_at
    let count = 3 + CONTENT_COLUMNS.len() + 5;
    let placeholders: Vec<String> = (1..=count).map(|i| format!("${}", i)).collect();
    format!(
        "INSERT INTO bills (bill_prefix, bill_seq, bill_number, {}, total, bill_date, created_by, created_at, updated_at) \
         VALUES ({}) RETURNING {}",
        CONTENT_COLUMNS.join(", "),
        placeholders.join(", "),
        *SELECT_COLUMNS
    )
});

static UPDATE_SQL: Lazy<String> = Lazy::new(|| {
    let mut assignments: Vec<String> = CONTENT_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = ${}", column, i + 1))
        .collect();
    let next = CONTENT_COLUMNS.len();
    assignments.push(format!("total = ${}", next + 1));
    assignments.push(format!("bill_date = ${}", next + 2));
    assignments.push(format!("updated_at = ${}", next + 3));
    format!(
        "UPDATE bills SET {} WHERE id = ${} RETURNING {}",
        assignments.join(", "),
        next + 4,
        *SELECT_COLUMNS
    )
});

/// Repository for bill rows
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: PgPool,
}

impl BillRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the row with the highest id
    pub async fn find_latest(&self) -> Result<Option<BillRow>, DatabaseError> {
        let sql = format!("SELECT {} FROM bills ORDER BY id DESC LIMIT 1", *SELECT_COLUMNS);
        let row = sqlx::query_as::<_, BillRow>(&sql)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Inserts a bill and returns the stored row
    ///
    /// # Errors
    ///
    /// `DatabaseError::DuplicateEntry` when the bill number is taken
    pub async fn insert(&self, bill: &NewBill) -> Result<BillRow, DatabaseError> {
        let query = sqlx::query(INSERT_SQL.as_str())
            .bind(i64::from(bill.bill_number.prefix()))
            .bind(bill.bill_number.seq() as i16)
            .bind(bill.bill_number.to_string());

        let row = bind_content(query, &bill.content)
            .bind(bill.total)
            .bind(bill.bill_date)
            .bind(&bill.created_by)
            .bind(bill.created_at)
            .bind(bill.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(BillRow::from_row(&row)?)
    }

    /// Fetches a row by id
    pub async fn find_by_id(&self, id: i64) -> Result<Option<BillRow>, DatabaseError> {
        let sql = format!("SELECT {} FROM bills WHERE id = $1", *SELECT_COLUMNS);
        let row = sqlx::query_as::<_, BillRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Returns all rows in key order
    pub async fn find_all(&self) -> Result<Vec<BillRow>, DatabaseError> {
        let sql = format!("SELECT {} FROM bills ORDER BY id", *SELECT_COLUMNS);
        let rows = sqlx::query_as::<_, BillRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Overwrites the mutable columns of a row
    ///
    /// Bill number, creator and creation time are never rewritten. Returns
    /// `None` when no row has the given id.
    pub async fn update(
        &self,
        id: i64,
        content: &BillContent,
        total: Decimal,
        bill_date: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<BillRow>, DatabaseError> {
        let row = bind_content(sqlx::query(UPDATE_SQL.as_str()), content)
            .bind(total)
            .bind(bill_date)
            .bind(updated_at)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| BillRow::from_row(&row))
            .transpose()
            .map_err(DatabaseError::from)
    }

    /// Deletes a row, returning the number of rows removed
    pub async fn delete(&self, id: i64) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM bills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Binds content values in `CONTENT_COLUMNS` order
fn bind_content<'q>(
    query: Query<'q, Postgres, PgArguments>,
    content: &'q BillContent,
) -> Query<'q, Postgres, PgArguments> {
    let mut query = query.bind(&content.customer_name).bind(&content.phone);

    for item in &content.items {
        query = query
            .bind(&item.name)
            .bind(item.amount)
            .bind(item.tax)
            .bind(item.tax_pass_through)
            .bind(item.check)
            .bind(&item.car_registration)
            .bind(&item.reference.value)
            .bind(&item.reference.kind);
    }

    for extension in &content.extensions {
        query = query.bind(&extension.label).bind(extension.amount);
    }

    query
        .bind(&content.payment_method)
        .bind(&content.description)
}

/// Database row for a bill
#[derive(Debug, Clone)]
pub struct BillRow {
    pub id: i64,
    pub bill_prefix: i64,
    pub bill_seq: i16,
    pub bill_number: String,
    pub content: BillContent,
    pub total: Decimal,
    pub bill_date: DateTime<Utc>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for BillRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let mut content = BillContent {
            customer_name: row.try_get("username")?,
            phone: row.try_get("phone")?,
            payment_method: row.try_get("payment_method")?,
            description: row.try_get("description")?,
            ..Default::default()
        };

        for (index, item) in content.items.iter_mut().enumerate() {
            let slot = index + 1;
            item.name = row.try_get(format!("name{}", slot).as_str())?;
            item.amount = row.try_get(format!("amount{}", slot).as_str())?;
            item.tax = row.try_get(format!("tax{}", slot).as_str())?;
            item.tax_pass_through = row.try_get(format!("taxgo{}", slot).as_str())?;
            item.check = row.try_get(format!("check{}", slot).as_str())?;
            item.car_registration = row.try_get(format!("car_registration{}", slot).as_str())?;
            item.reference.value = row.try_get(format!("refer{}", slot).as_str())?;
            item.reference.kind = row.try_get(format!("typerefer{}", slot).as_str())?;
        }

        for (index, extension) in content.extensions.iter_mut().enumerate() {
            let slot = index + 1;
            extension.label = row.try_get(format!("extension{}_type", slot).as_str())?;
            extension.amount = row.try_get(format!("extension{}_amount", slot).as_str())?;
        }

        Ok(Self {
            id: row.try_get("id")?,
            bill_prefix: row.try_get("bill_prefix")?,
            bill_seq: row.try_get("bill_seq")?,
            bill_number: row.try_get("bill_number")?,
            content,
            total: row.try_get("total")?,
            bill_date: row.try_get("bill_date")?,
            created_by: row.try_get("created_by")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_column_count() {
        // two customer fields, eight per slot, two per extension, payment method, description
        assert_eq!(CONTENT_COLUMNS.len(), 2 + 8 * LINE_ITEM_SLOTS + 2 * EXTENSION_SLOTS + 2);
        assert!(CONTENT_COLUMNS.contains(&"taxgo3".to_string()));
        assert!(CONTENT_COLUMNS.contains(&"extension2_amount".to_string()));
    }

    #[test]
    fn test_insert_placeholders_match_columns() {
        let expected = 3 + CONTENT_COLUMNS.len() + 5;
        assert!(INSERT_SQL.contains(&format!("${})", expected)));
        assert!(!INSERT_SQL.contains(&format!("${}", expected + 1)));
    }

    #[test]
    fn test_update_binds_id_last() {
        let id_placeholder = CONTENT_COLUMNS.len() + 4;
        assert!(UPDATE_SQL.contains(&format!("WHERE id = ${} ", id_placeholder)));
        assert!(!UPDATE_SQL.contains("bill_number ="));
        assert!(!UPDATE_SQL.contains("created_by ="));
    }
}
