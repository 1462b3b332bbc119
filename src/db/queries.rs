use rusqlite::types::ToSql;
use rusqlite::{params, Connection};

use crate::models::{Appointment, AppointmentStatus, DirectorGeneral, User};

// ── Appointments ──

const APPOINTMENT_COLUMNS: &str =
    "id, full_name, phone, email, subject, date, time, status, token_image, created_at, updated_at";

fn parse_appointment_row(row: &rusqlite::Row) -> rusqlite::Result<Appointment> {
    let status: String = row.get(7)?;
    Ok(Appointment {
        id: row.get(0)?,
        full_name: row.get(1)?,
        phone: row.get(2)?,
        email: row.get(3)?,
        subject: row.get(4)?,
        date: row.get(5)?,
        time: row.get(6)?,
        status: AppointmentStatus::parse(&status),
        token_image: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

pub struct NewAppointment<'a> {
    pub full_name: &'a str,
    pub phone: &'a str,
    pub email: Option<&'a str>,
    pub subject: &'a str,
    pub date: &'a str,
    pub time: &'a str,
    pub token_image: &'a str,
}

pub fn count_for_date(conn: &Connection, date: &str) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM rendezvous WHERE date = ?1",
        params![date],
        |row| row.get(0),
    )
}

pub fn slot_exists(conn: &Connection, date: &str, time: &str) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM rendezvous WHERE date = ?1 AND time = ?2",
        params![date, time],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn insert_appointment(conn: &Connection, appt: &NewAppointment) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO rendezvous (full_name, phone, email, subject, date, time, status, token_image)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            appt.full_name,
            appt.phone,
            appt.email,
            appt.subject,
            appt.date,
            appt.time,
            AppointmentStatus::Pending.as_str(),
            appt.token_image,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_appointment(conn: &Connection, id: i64) -> rusqlite::Result<Option<Appointment>> {
    let result = conn.query_row(
        &format!("SELECT {APPOINTMENT_COLUMNS} FROM rendezvous WHERE id = ?1"),
        params![id],
        parse_appointment_row,
    );

    match result {
        Ok(appt) => Ok(Some(appt)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn count_appointments(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM rendezvous", [], |row| row.get(0))
}

pub fn list_appointments(conn: &Connection, limit: i64, offset: i64) -> rusqlite::Result<Vec<Appointment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM rendezvous ORDER BY date DESC, time DESC LIMIT ?1 OFFSET ?2"
    ))?;
    let rows = stmt.query_map(params![limit, offset], parse_appointment_row)?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row?);
    }
    Ok(appointments)
}

/// Applies only the provided columns; `updated_at` is always refreshed.
pub fn update_appointment_fields(
    conn: &Connection,
    id: i64,
    fields: &[(&'static str, Box<dyn ToSql>)],
) -> rusqlite::Result<usize> {
    let mut set_clauses: Vec<String> = fields
        .iter()
        .enumerate()
        .map(|(i, (column, _))| format!("{column} = ?{}", i + 1))
        .collect();
    set_clauses.push("updated_at = datetime('now')".to_string());

    let sql = format!(
        "UPDATE rendezvous SET {} WHERE id = ?{}",
        set_clauses.join(", "),
        fields.len() + 1
    );

    let mut params_refs: Vec<&dyn ToSql> = fields.iter().map(|(_, value)| value.as_ref()).collect();
    params_refs.push(&id);

    conn.execute(&sql, params_refs.as_slice())
}

pub fn delete_appointment(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM rendezvous WHERE id = ?1", params![id])
}

/// Lookup used by check-in: exact id wins, otherwise date and/or substring
/// name match. Ties break on the lowest id.
pub fn find_for_verification(
    conn: &Connection,
    id: Option<i64>,
    date: Option<&str>,
    name: Option<&str>,
) -> rusqlite::Result<Option<Appointment>> {
    let (clause, params_vec): (&str, Vec<Box<dyn ToSql>>) = if let Some(id) = id {
        ("id = ?1", vec![Box::new(id)])
    } else {
        match (date, name) {
            (Some(d), Some(n)) => (
                "date = ?1 AND full_name LIKE ?2",
                vec![Box::new(d.to_string()), Box::new(format!("%{n}%"))],
            ),
            (Some(d), None) => ("date = ?1", vec![Box::new(d.to_string())]),
            (None, Some(n)) => ("full_name LIKE ?1", vec![Box::new(format!("%{n}%"))]),
            (None, None) => return Ok(None),
        }
    };

    let sql =
        format!("SELECT {APPOINTMENT_COLUMNS} FROM rendezvous WHERE {clause} ORDER BY id ASC LIMIT 1");
    let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();

    let result = conn.query_row(&sql, params_refs.as_slice(), parse_appointment_row);
    match result {
        Ok(appt) => Ok(Some(appt)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn mark_verified(conn: &Connection, id: i64, token_image: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE rendezvous SET status = ?1, token_image = ?2, updated_at = datetime('now') WHERE id = ?3",
        params![AppointmentStatus::Verified.as_str(), token_image, id],
    )
}

// ── Date aggregates ──

pub struct FullDate {
    pub date: String,
    pub times: String,
    pub count: i64,
}

pub struct OpenDate {
    pub date: String,
    pub count: i64,
}

pub fn booked_slots(conn: &Connection, date: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT time FROM rendezvous WHERE date = ?1 ORDER BY time ASC")?;
    let rows = stmt.query_map(params![date], |row| row.get(0))?;

    let mut times = vec![];
    for row in rows {
        times.push(row?);
    }
    Ok(times)
}

pub fn booked_dates(conn: &Connection, capacity: i64) -> rusqlite::Result<Vec<FullDate>> {
    let mut stmt = conn.prepare(
        "SELECT date, GROUP_CONCAT(time ORDER BY time ASC), COUNT(*) AS count
         FROM rendezvous GROUP BY date HAVING count >= ?1",
    )?;
    let rows = stmt.query_map(params![capacity], |row| {
        Ok(FullDate {
            date: row.get(0)?,
            times: row.get(1)?,
            count: row.get(2)?,
        })
    })?;

    let mut dates = vec![];
    for row in rows {
        dates.push(row?);
    }
    Ok(dates)
}

pub fn available_dates(conn: &Connection, capacity: i64) -> rusqlite::Result<Vec<OpenDate>> {
    let mut stmt = conn.prepare(
        "SELECT date, COUNT(*) AS count FROM rendezvous GROUP BY date HAVING count < ?1",
    )?;
    let rows = stmt.query_map(params![capacity], |row| {
        Ok(OpenDate {
            date: row.get(0)?,
            count: row.get(1)?,
        })
    })?;

    let mut dates = vec![];
    for row in rows {
        dates.push(row?);
    }
    Ok(dates)
}

// ── Director dashboard ──

pub struct DirectorAppointment {
    pub id: i64,
    pub visitor_name: String,
    pub subject: String,
    pub date: String,
    pub time: String,
    pub status: String,
}

pub fn director_appointments(conn: &Connection) -> rusqlite::Result<Vec<DirectorAppointment>> {
    let mut stmt = conn.prepare(
        "SELECT id, full_name, subject, date, time, status FROM rendezvous ORDER BY date DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(DirectorAppointment {
            id: row.get(0)?,
            visitor_name: row.get(1)?,
            subject: row.get(2)?,
            date: row.get(3)?,
            time: row.get(4)?,
            status: row.get(5)?,
        })
    })?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row?);
    }
    Ok(appointments)
}

// ── Users ──

fn parse_user_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        is_active: row.get::<_, i64>(4)? != 0,
        is_admin: row.get::<_, i64>(5)? != 0,
        created_at: row.get(6)?,
    })
}

const USER_COLUMNS: &str = "id, username, email, password_hash, is_active, is_admin, created_at";

pub fn insert_user(
    conn: &Connection,
    username: &str,
    email: &str,
    password_hash: &str,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO users (username, email, password_hash, is_active) VALUES (?1, ?2, ?3, 0)",
        params![username, email, password_hash],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn activate_user(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("UPDATE users SET is_active = 1 WHERE id = ?1", params![id])
}

pub fn get_user_by_username(conn: &Connection, username: &str) -> rusqlite::Result<Option<User>> {
    let result = conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
        params![username],
        parse_user_row,
    );
    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn get_user_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<User>> {
    let result = conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        params![id],
        parse_user_row,
    );
    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn list_users(conn: &Connection) -> rusqlite::Result<Vec<User>> {
    let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC"))?;
    let rows = stmt.query_map([], parse_user_row)?;

    let mut users = vec![];
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}

// ── Directors-general ──

pub struct NewDirector<'a> {
    pub last_name: &'a str,
    pub first_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub phone: Option<&'a str>,
}

pub fn director_email_exists(conn: &Connection, email: &str) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM directors_general WHERE email = ?1",
        params![email],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn insert_director(conn: &Connection, dg: &NewDirector) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO directors_general (last_name, first_name, email, password_hash, phone)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![dg.last_name, dg.first_name, dg.email, dg.password_hash, dg.phone],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_active_director_by_email(
    conn: &Connection,
    email: &str,
) -> rusqlite::Result<Option<DirectorGeneral>> {
    let result = conn.query_row(
        "SELECT id, last_name, first_name, email, password_hash, phone, status, created_at
         FROM directors_general WHERE email = ?1 AND status = 'actif'",
        params![email],
        |row| {
            Ok(DirectorGeneral {
                id: row.get(0)?,
                last_name: row.get(1)?,
                first_name: row.get(2)?,
                email: row.get(3)?,
                password_hash: row.get(4)?,
                phone: row.get(5)?,
                status: row.get(6)?,
                created_at: row.get(7)?,
            })
        },
    );
    match result {
        Ok(dg) => Ok(Some(dg)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}
