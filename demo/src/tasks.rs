//! Task operations.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use sqlgen_runtime::{Datastore, RuntimeError, Value, ignore_duplicate};
use thiserror::Error;
use tracing::debug;

use crate::sql::{self, AllColumns, columns, tables};

/// Timestamp layout stored in `TEXT` columns.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Errors from task operations.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// A stored value does not have the expected shape.
    #[error("cannot decode {column}: {reason}")]
    Decode { column: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, TaskError>;

/// Open/close state of a task, recorded as status changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Open,
    Close,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::Close => "close",
        }
    }
}

/// A task to create.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub name: String,
    pub start_at: NaiveDateTime,
    pub interval_day: Option<i64>,
}

impl NewTask {
    pub fn new(name: impl Into<String>, start_at: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            start_at,
            interval_day: None,
        }
    }

    /// Repeats the task every `days` days.
    pub fn every(mut self, days: i64) -> Self {
        self.interval_day = Some(days);
        self
    }
}

/// A stored task with its most recent completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub start_at: NaiveDateTime,
    pub interval_day: Option<i64>,
    pub done_at: Option<NaiveDateTime>,
}

impl Task {
    /// Next due date after `now`, or `None` for a one-off task.
    pub fn next_date(&self, now: NaiveDateTime) -> Option<NaiveDate> {
        let interval = self.interval_day.filter(|days| *days > 0)?;
        let elapsed = (now.date() - self.start_at.date()).num_days();
        let remain = interval - elapsed.rem_euclid(interval);
        now.date().checked_add_signed(Duration::days(remain))
    }
}

fn timestamp(at: NaiveDateTime) -> String {
    at.format(TIME_FORMAT).to_string()
}

/// Creates every task of `new_tasks` in one statement.
pub fn add_tasks<D: Datastore>(db: &D, new_tasks: &[NewTask]) -> Result<()> {
    let rows: Vec<sql::InsertPeriodicTaskParams> = new_tasks
        .iter()
        .map(|task| sql::InsertPeriodicTaskParams {
            name: task.name.clone(),
            start_at: timestamp(task.start_at),
            interval_day: task.interval_day,
        })
        .collect();
    sql::insert_periodic_task(db, &rows)?;
    Ok(())
}

/// Overwrites a task. Fields left `None` are reset, not kept.
pub fn update_task<D: Datastore>(db: &D, id: i64, task: &NewTask) -> Result<()> {
    sql::replace_periodic_task(
        db,
        &[sql::ReplacePeriodicTaskParams {
            id,
            name: Some(task.name.clone()),
            start_at: Some(timestamp(task.start_at)),
            interval_day: task.interval_day,
        }],
    )?;
    Ok(())
}

/// Records a completion of task `id` at `now`.
pub fn done_task<D: Datastore>(db: &D, id: i64, now: NaiveDateTime) -> Result<()> {
    sql::insert_done_task(
        db,
        &[sql::InsertDoneTaskParams {
            periodic_task_id: id,
            done_at: timestamp(now),
        }],
    )?;
    Ok(())
}

/// Records a status change. Repeating the current status is a no-op.
pub fn change_status<D: Datastore>(
    db: &D,
    id: i64,
    status: Status,
    now: NaiveDateTime,
) -> Result<()> {
    let result = sql::insert_periodic_task_status_change(
        db,
        &[sql::InsertPeriodicTaskStatusChangeParams {
            periodic_task_id: id,
            changed_at: timestamp(now),
            status: status.as_str().to_string(),
        }],
    );
    ignore_duplicate(result)?;
    Ok(())
}

/// Deletes task `id` together with its completions and status changes.
pub fn remove_task<D: Datastore>(db: &D, id: i64) -> Result<()> {
    sql::delete_periodic_task(
        db,
        &sql::DeletePeriodicTaskParams {
            id: Some(id),
            ..Default::default()
        },
    )?;
    Ok(())
}

/// Every task in creation order, with its latest completion.
pub fn fetch_tasks<D: Datastore>(db: &D) -> Result<Vec<Task>> {
    let later = AllColumns::DoneTaskDoneAt.alias("later");
    let later_task = AllColumns::DoneTaskPeriodicTaskId.alias("later");
    let query = format!(
        "SELECT {id}, {name}, {start_at}, {interval_day}, {done_at}
FROM {task}
LEFT JOIN {done} ON {done_task_id} = {id}
  AND NOT EXISTS (
    SELECT 1 FROM {done} later
    WHERE {later_task} = {done_task_id} AND {later} > {done_at}
  )
ORDER BY {id}",
        id = columns::periodic_task::ID,
        name = columns::periodic_task::NAME,
        start_at = columns::periodic_task::START_AT,
        interval_day = columns::periodic_task::INTERVAL_DAY,
        done_at = columns::done_task::DONE_AT,
        done_task_id = columns::done_task::PERIODIC_TASK_ID,
        task = tables::PERIODIC_TASK,
        done = tables::DONE_TASK,
    );

    let rows = db.query(&query, &[])?;
    debug!(rows = rows.len(), "fetched tasks");
    rows.into_iter().map(decode_task).collect()
}

fn decode_task(row: Vec<Value>) -> Result<Task> {
    let mut values = row.into_iter();
    let mut next = |column: &'static str| {
        values.next().ok_or_else(|| TaskError::Decode {
            column,
            reason: "missing value".to_string(),
        })
    };

    let id = integer(columns::periodic_task::ID, next(columns::periodic_task::ID)?)?;
    let name = text(columns::periodic_task::NAME, next(columns::periodic_task::NAME)?)?;
    let start_at = text(
        columns::periodic_task::START_AT,
        next(columns::periodic_task::START_AT)?,
    )?;
    let interval_day = match next(columns::periodic_task::INTERVAL_DAY)? {
        Value::Null => None,
        value => Some(integer(columns::periodic_task::INTERVAL_DAY, value)?),
    };
    let done_at = match next(columns::done_task::DONE_AT)? {
        Value::Null => None,
        value => Some(datetime(
            columns::done_task::DONE_AT,
            &text(columns::done_task::DONE_AT, value)?,
        )?),
    };

    Ok(Task {
        id,
        name,
        start_at: datetime(columns::periodic_task::START_AT, &start_at)?,
        interval_day,
        done_at,
    })
}

fn integer(column: &'static str, value: Value) -> Result<i64> {
    match value {
        Value::Integer(n) => Ok(n),
        other => Err(TaskError::Decode {
            column,
            reason: format!("expected integer, found {other:?}"),
        }),
    }
}

fn text(column: &'static str, value: Value) -> Result<String> {
    match value {
        Value::Text(s) => Ok(s),
        other => Err(TaskError::Decode {
            column,
            reason: format!("expected text, found {other:?}"),
        }),
    }
}

fn datetime(column: &'static str, text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TIME_FORMAT).map_err(|err| TaskError::Decode {
        column,
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_milli_opt(hour, 0, 0, 250)
            .unwrap()
    }

    #[test]
    fn test_timestamp_round_trips() {
        let text = timestamp(at(2, 9));
        assert_eq!(text, "2024-01-02T09:00:00.250");
        assert_eq!(datetime("t.c", &text).unwrap(), at(2, 9));
    }

    #[test]
    fn test_next_date_counts_from_start() {
        let task = Task {
            id: 1,
            name: "water".to_string(),
            start_at: at(1, 9),
            interval_day: Some(3),
            done_at: None,
        };
        assert_eq!(task.next_date(at(1, 12)), NaiveDate::from_ymd_opt(2024, 1, 4));
        assert_eq!(task.next_date(at(5, 12)), NaiveDate::from_ymd_opt(2024, 1, 7));
    }

    #[test]
    fn test_one_off_task_has_no_next_date() {
        let task = Task {
            id: 1,
            name: "call".to_string(),
            start_at: at(1, 9),
            interval_day: None,
            done_at: None,
        };
        assert_eq!(task.next_date(at(2, 9)), None);
    }

    #[test]
    fn test_decode_rejects_wrong_types() {
        let row = vec![Value::Text("x".to_string())];
        assert!(matches!(
            decode_task(row),
            Err(TaskError::Decode { column: "periodicTask.id", .. })
        ));
    }
}
