use crate::dto::study_dto::DailyStudyTime;
use crate::error::{Error, Result};
use crate::models::study_session::{StudySession, StudyTimeEntry};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

const SESSION_COLUMNS: &str = "id, user_id, start_time, end_time, duration_seconds, created_at";

/// Study-time tracker for one user. Time is measured in whole minutes since
/// `started_at`; logging moves `started_at` forward so nothing is counted twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTracker {
    pub user_id: String,
    pub started_at: DateTime<Utc>,
    pub active: bool,
}

impl SessionTracker {
    pub fn start(user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            started_at: now,
            active: true,
        }
    }

    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> i64 {
        if !self.active {
            return 0;
        }
        (now - self.started_at).num_minutes().max(0)
    }

    /// Minutes to log, if at least one full minute has passed.
    pub fn checkpoint(&mut self, now: DateTime<Utc>) -> Option<i64> {
        let minutes = self.elapsed_minutes(now);
        if minutes > 0 {
            self.started_at = now;
            Some(minutes)
        } else {
            None
        }
    }

    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<i64> {
        let minutes = self.checkpoint(now);
        self.active = false;
        minutes
    }
}

/// Minutes taken off a tracker by a checkpoint or stop, with the tracker as
/// it was before. Handed back to [`StudyClock::restore`] when the minutes
/// could not be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lap {
    pub minutes: i64,
    pub previous: SessionTracker,
}

/// Registry of running trackers, one per user.
#[derive(Clone, Default)]
pub struct StudyClock {
    trackers: Arc<Mutex<HashMap<String, SessionTracker>>>,
}

impl StudyClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionTracker>> {
        // A panic while holding the lock leaves the map itself consistent.
        self.trackers.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Starting an already running tracker keeps its original start time.
    pub fn start(&self, user_id: &str, now: DateTime<Utc>) -> SessionTracker {
        self.lock()
            .entry(user_id.to_string())
            .or_insert_with(|| SessionTracker::start(user_id, now))
            .clone()
    }

    pub fn checkpoint(&self, user_id: &str, now: DateTime<Utc>) -> Option<Lap> {
        let mut trackers = self.lock();
        let tracker = trackers.get_mut(user_id)?;
        let previous = tracker.clone();
        let minutes = tracker.checkpoint(now)?;
        Some(Lap { minutes, previous })
    }

    pub fn stop(&self, user_id: &str, now: DateTime<Utc>) -> Option<Lap> {
        let mut tracker = self.lock().remove(user_id)?;
        let previous = tracker.clone();
        tracker.stop(now).map(|minutes| Lap { minutes, previous })
    }

    /// Puts back the tracker a lap was taken from.
    pub fn restore(&self, lap: Lap) {
        let tracker = lap.previous;
        self.lock().insert(tracker.user_id.clone(), tracker);
    }

    pub fn current(&self, user_id: &str, now: DateTime<Utc>) -> (bool, i64) {
        match self.lock().get(user_id) {
            Some(t) => (t.active, t.elapsed_minutes(now)),
            None => (false, 0),
        }
    }
}

#[derive(Clone)]
pub struct SessionService {
    pool: PgPool,
}

impl SessionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn start_session(&self, user_id: &str) -> Result<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO sessions (user_id, start_time, duration_seconds)
            VALUES ($1, NOW(), 0)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id, session_id = %id, "Study session started");
        Ok(id)
    }

    pub async fn update_duration(
        &self,
        user_id: &str,
        id: Uuid,
        duration_seconds: i32,
    ) -> Result<StudySession> {
        self.update(user_id, id, duration_seconds, false).await
    }

    pub async fn end_session(
        &self,
        user_id: &str,
        id: Uuid,
        duration_seconds: i32,
    ) -> Result<StudySession> {
        self.update(user_id, id, duration_seconds, true).await
    }

    async fn update(
        &self,
        user_id: &str,
        id: Uuid,
        duration_seconds: i32,
        close: bool,
    ) -> Result<StudySession> {
        let session = sqlx::query_as::<_, StudySession>(&format!(
            r#"
            UPDATE sessions
            SET duration_seconds = $3,
                end_time = CASE WHEN $4 THEN NOW() ELSE end_time END
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            SESSION_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .bind(duration_seconds)
        .bind(close)
        .fetch_optional(&self.pool)
        .await?;

        session.ok_or_else(|| Error::NotFound("Session not found".into()))
    }

    /// Sessions started since `day_start`, newest first.
    pub async fn sessions_since(
        &self,
        user_id: &str,
        day_start: DateTime<Utc>,
    ) -> Result<Vec<StudySession>> {
        let sessions = sqlx::query_as::<_, StudySession>(&format!(
            r#"
            SELECT {}
            FROM sessions
            WHERE user_id = $1 AND start_time >= $2
            ORDER BY start_time DESC
            "#,
            SESSION_COLUMNS
        ))
        .bind(user_id)
        .bind(day_start)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    pub async fn log_minutes(
        &self,
        user_id: &str,
        date: NaiveDate,
        minutes: i64,
    ) -> Result<StudyTimeEntry> {
        let minutes = i32::try_from(minutes)
            .map_err(|_| Error::BadRequest("Study time out of range".into()))?;

        let entry = sqlx::query_as::<_, StudyTimeEntry>(
            r#"
            INSERT INTO user_sessions (user_id, session_date, duration_minutes)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, session_date, duration_minutes, created_at
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(minutes)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Logged {} minutes for user: {}", minutes, user_id);
        Ok(entry)
    }

    pub async fn study_time_since(
        &self,
        user_id: &str,
        since: NaiveDate,
    ) -> Result<Vec<StudyTimeEntry>> {
        let entries = sqlx::query_as::<_, StudyTimeEntry>(
            r#"
            SELECT id, user_id, session_date, duration_minutes, created_at
            FROM user_sessions
            WHERE user_id = $1 AND session_date >= $2
            ORDER BY session_date ASC
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

pub fn total_seconds(sessions: &[StudySession]) -> i64 {
    sessions.iter().map(|s| s.duration_seconds as i64).sum()
}

/// Sums logged minutes per day; `hours` is rounded to one decimal.
pub fn daily_study_time(entries: &[StudyTimeEntry]) -> Vec<DailyStudyTime> {
    let mut by_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for e in entries {
        *by_day.entry(e.session_date).or_insert(0) += e.duration_minutes as i64;
    }

    by_day
        .into_iter()
        .map(|(date, minutes)| DailyStudyTime {
            date,
            minutes,
            hours: (minutes as f64 / 60.0 * 10.0).round() / 10.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn checkpoint_needs_a_full_minute() {
        let mut tracker = SessionTracker::start("u1", t0());
        assert_eq!(tracker.checkpoint(t0() + Duration::seconds(59)), None);
        assert_eq!(tracker.started_at, t0());

        assert_eq!(tracker.checkpoint(t0() + Duration::seconds(150)), Some(2));
        assert_eq!(tracker.started_at, t0() + Duration::seconds(150));
        assert_eq!(tracker.elapsed_minutes(t0() + Duration::seconds(200)), 0);
    }

    #[test]
    fn stop_logs_the_remainder_and_deactivates() {
        let mut tracker = SessionTracker::start("u1", t0());
        assert_eq!(tracker.stop(t0() + Duration::minutes(5)), Some(5));
        assert!(!tracker.active);
        assert_eq!(tracker.elapsed_minutes(t0() + Duration::minutes(50)), 0);
        assert_eq!(tracker.stop(t0() + Duration::minutes(60)), None);
    }

    #[test]
    fn clock_keeps_one_tracker_per_user() {
        let clock = StudyClock::new();
        clock.start("u1", t0());
        clock.start("u1", t0() + Duration::minutes(10));
        clock.start("u2", t0() + Duration::minutes(3));

        assert_eq!(clock.current("u1", t0() + Duration::minutes(12)), (true, 12));
        assert_eq!(clock.current("u2", t0() + Duration::minutes(12)), (true, 9));
        assert_eq!(clock.current("nobody", t0()), (false, 0));

        let lap = clock.checkpoint("u1", t0() + Duration::minutes(12)).unwrap();
        assert_eq!(lap.minutes, 12);
        let lap = clock.stop("u1", t0() + Duration::minutes(15)).unwrap();
        assert_eq!(lap.minutes, 3);
        assert_eq!(clock.current("u1", t0() + Duration::minutes(20)), (false, 0));
        assert_eq!(clock.stop("u1", t0() + Duration::minutes(20)), None);
    }

    #[test]
    fn restored_laps_are_counted_again() {
        let clock = StudyClock::new();
        clock.start("u1", t0());

        let lap = clock.checkpoint("u1", t0() + Duration::minutes(7)).unwrap();
        assert_eq!(clock.current("u1", t0() + Duration::minutes(8)), (true, 1));
        clock.restore(lap);
        assert_eq!(clock.current("u1", t0() + Duration::minutes(8)), (true, 8));

        let lap = clock.stop("u1", t0() + Duration::minutes(9)).unwrap();
        assert_eq!(clock.current("u1", t0() + Duration::minutes(9)), (false, 0));
        clock.restore(lap);
        assert_eq!(clock.current("u1", t0() + Duration::minutes(9)), (true, 9));
    }

    #[test]
    fn daily_totals_round_hours_to_one_decimal() {
        let day = |d: u32| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
        let entry = |d: u32, m: i32| StudyTimeEntry {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            session_date: day(d),
            duration_minutes: m,
            created_at: t0(),
        };
        let out = daily_study_time(&[entry(2, 20), entry(1, 45), entry(2, 25)]);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].date, day(1));
        assert_eq!(out[0].hours, 0.8);
        assert_eq!(out[1].minutes, 45);
        assert_eq!(out[1].hours, 0.8);
    }
}
