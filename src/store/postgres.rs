// src/store/postgres.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use super::Store;
use crate::error::InfraResult;
use crate::models::{
    AppointmentChanges, AppointmentRecord, AppointmentView, NameQuery, NewAppointment,
    PatientChanges, PatientDetails, PatientRecord, UserCredentials, UserRecord, UserWrite,
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `%fragment%` with LIKE metacharacters escaped, so user input only ever
/// matches literally.
fn like_pattern(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len() + 2);
    escaped.push('%');
    for c in fragment.trim().chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> InfraResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /* ============================================================
       patients
       ============================================================ */

    async fn patient_exists(&self, p_id: Uuid) -> InfraResult<bool> {
        let exists: bool =
            sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM patient WHERE p_id = $1)"#)
                .bind(p_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn patient_booked_by_other_user(&self, p_id: Uuid, user_id: Uuid) -> InfraResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
              SELECT 1
              FROM appointment
              WHERE p_id = $1
                AND user_id <> $2
            )
            "#,
        )
        .bind(p_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert_patient(&self, patient: &PatientDetails) -> InfraResult<PatientRecord> {
        let row = sqlx::query_as::<_, PatientRecord>(
            r#"
            INSERT INTO patient (p_first_name, p_last_name, p_email, dob, phone_number)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING p_id, p_first_name, p_last_name, p_email, dob, phone_number
            "#,
        )
        .bind(&patient.p_first_name)
        .bind(&patient.p_last_name)
        .bind(&patient.p_email)
        .bind(patient.dob)
        .bind(&patient.phone_number)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_owned_patient(
        &self,
        p_id: Uuid,
        user_id: Uuid,
    ) -> InfraResult<Option<PatientRecord>> {
        let row = sqlx::query_as::<_, PatientRecord>(
            r#"
            SELECT p.p_id, p.p_first_name, p.p_last_name, p.p_email, p.dob, p.phone_number
            FROM patient p
            WHERE p.p_id = $1
              AND EXISTS (
                SELECT 1 FROM appointment a
                WHERE a.p_id = p.p_id AND a.user_id = $2
              )
            "#,
        )
        .bind(p_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_owned_patient(
        &self,
        changes: &PatientChanges,
    ) -> InfraResult<Option<PatientRecord>> {
        let d = &changes.details;
        let row = sqlx::query_as::<_, PatientRecord>(
            r#"
            UPDATE patient p
            SET p_first_name = $3,
                p_last_name  = $4,
                p_email      = $5,
                dob          = $6,
                phone_number = $7
            WHERE p.p_id = $1
              AND EXISTS (
                SELECT 1 FROM appointment a
                WHERE a.p_id = p.p_id AND a.user_id = $2
              )
            RETURNING p.p_id, p.p_first_name, p.p_last_name, p.p_email, p.dob, p.phone_number
            "#,
        )
        .bind(changes.p_id)
        .bind(changes.user_id)
        .bind(&d.p_first_name)
        .bind(&d.p_last_name)
        .bind(&d.p_email)
        .bind(d.dob)
        .bind(&d.phone_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_patient(&self, p_id: Uuid) -> InfraResult<u64> {
        let res = sqlx::query(r#"DELETE FROM patient WHERE p_id = $1"#)
            .bind(p_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    async fn patients_for_user(&self, user_id: Uuid) -> InfraResult<Vec<PatientRecord>> {
        let rows = sqlx::query_as::<_, PatientRecord>(
            r#"
            SELECT DISTINCT p.p_id, p.p_first_name, p.p_last_name, p.p_email, p.dob, p.phone_number
            FROM patient p
            JOIN appointment a ON a.p_id = p.p_id
            WHERE a.user_id = $1
            ORDER BY p.p_last_name, p.p_first_name, p.p_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn search_patients(
        &self,
        user_id: Uuid,
        query: &NameQuery,
    ) -> InfraResult<Vec<PatientRecord>> {
        let rows = sqlx::query_as::<_, PatientRecord>(
            r#"
            SELECT DISTINCT p.p_id, p.p_first_name, p.p_last_name, p.p_email, p.dob, p.phone_number
            FROM patient p
            JOIN appointment a ON a.p_id = p.p_id
            WHERE a.user_id = $1
              AND (p.p_first_name ILIKE $2 OR p.p_last_name ILIKE $3)
            ORDER BY p.p_last_name, p.p_first_name, p.p_id
            "#,
        )
        .bind(user_id)
        .bind(like_pattern(&query.first_name))
        .bind(like_pattern(&query.last_name))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /* ============================================================
       appointments
       ============================================================ */

    async fn appointments_on_date(
        &self,
        user_id: Uuid,
        doa: NaiveDate,
    ) -> InfraResult<Vec<AppointmentRecord>> {
        let rows = sqlx::query_as::<_, AppointmentRecord>(
            r#"
            SELECT appointment_num, doa, start_time, end_time, appointment_description, p_id, user_id
            FROM appointment
            WHERE user_id = $1
              AND doa = $2
            ORDER BY start_time ASC
            "#,
        )
        .bind(user_id)
        .bind(doa)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_appointment(&self, appointment: &NewAppointment) -> InfraResult<Uuid> {
        let appointment_num: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO appointment (doa, start_time, end_time, appointment_description, p_id, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING appointment_num
            "#,
        )
        .bind(appointment.doa)
        .bind(appointment.start_time)
        .bind(appointment.end_time)
        .bind(&appointment.appointment_description)
        .bind(appointment.p_id)
        .bind(appointment.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(appointment_num)
    }

    async fn update_appointment(&self, changes: &AppointmentChanges) -> InfraResult<u64> {
        let res = sqlx::query(
            r#"
            UPDATE appointment
            SET doa = $3,
                start_time = $4,
                end_time = $5,
                appointment_description = $6
            WHERE appointment_num = $1
              AND user_id = $2
            "#,
        )
        .bind(changes.appointment_num)
        .bind(changes.user_id)
        .bind(changes.doa)
        .bind(changes.start_time)
        .bind(changes.end_time)
        .bind(&changes.appointment_description)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected())
    }

    async fn find_appointment(
        &self,
        appointment_num: Uuid,
        user_id: Uuid,
    ) -> InfraResult<Option<AppointmentRecord>> {
        let row = sqlx::query_as::<_, AppointmentRecord>(
            r#"
            SELECT appointment_num, doa, start_time, end_time, appointment_description, p_id, user_id
            FROM appointment
            WHERE appointment_num = $1
              AND user_id = $2
            "#,
        )
        .bind(appointment_num)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn appointment_view(
        &self,
        appointment_num: Uuid,
        user_id: Uuid,
    ) -> InfraResult<Option<AppointmentView>> {
        let row = sqlx::query_as::<_, AppointmentView>(
            r#"
            SELECT a.appointment_num, p.p_first_name, p.p_last_name,
                   a.doa, a.start_time, a.end_time, a.appointment_description
            FROM appointment a
            JOIN patient p ON p.p_id = a.p_id
            WHERE a.appointment_num = $1
              AND a.user_id = $2
            "#,
        )
        .bind(appointment_num)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_appointment(&self, appointment_num: Uuid, user_id: Uuid) -> InfraResult<u64> {
        let res = sqlx::query(
            r#"
            DELETE FROM appointment
            WHERE appointment_num = $1
              AND user_id = $2
            "#,
        )
        .bind(appointment_num)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected())
    }

    async fn appointments_for_user(&self, user_id: Uuid) -> InfraResult<Vec<AppointmentRecord>> {
        let rows = sqlx::query_as::<_, AppointmentRecord>(
            r#"
            SELECT appointment_num, doa, start_time, end_time, appointment_description, p_id, user_id
            FROM appointment
            WHERE user_id = $1
            ORDER BY doa ASC, start_time ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn appointment_views_on_date(
        &self,
        user_id: Uuid,
        doa: NaiveDate,
    ) -> InfraResult<Vec<AppointmentView>> {
        let rows = sqlx::query_as::<_, AppointmentView>(
            r#"
            SELECT a.appointment_num, p.p_first_name, p.p_last_name,
                   a.doa, a.start_time, a.end_time, a.appointment_description
            FROM appointment a
            JOIN patient p ON p.p_id = a.p_id
            WHERE a.user_id = $1
              AND a.doa = $2
            ORDER BY a.start_time ASC
            "#,
        )
        .bind(user_id)
        .bind(doa)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn search_appointment_views(
        &self,
        user_id: Uuid,
        query: &NameQuery,
    ) -> InfraResult<Vec<AppointmentView>> {
        let rows = sqlx::query_as::<_, AppointmentView>(
            r#"
            SELECT a.appointment_num, p.p_first_name, p.p_last_name,
                   a.doa, a.start_time, a.end_time, a.appointment_description
            FROM appointment a
            JOIN patient p ON p.p_id = a.p_id
            WHERE a.user_id = $1
              AND (p.p_first_name ILIKE $2 OR p.p_last_name ILIKE $3)
            ORDER BY a.doa ASC, a.start_time ASC
            "#,
        )
        .bind(user_id)
        .bind(like_pattern(&query.first_name))
        .bind(like_pattern(&query.last_name))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /* ============================================================
       users
       ============================================================ */

    async fn user_exists(&self, user_id: Uuid) -> InfraResult<bool> {
        let exists: bool =
            sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM app_user WHERE user_id = $1)"#)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn user_name_taken(&self, user_name: &str, except: Option<Uuid>) -> InfraResult<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
              SELECT 1
              FROM app_user
              WHERE user_name = $1
                AND ($2::uuid IS NULL OR user_id <> $2)
            )
            "#,
        )
        .bind(user_name)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    async fn insert_user(&self, user: &UserWrite) -> InfraResult<UserRecord> {
        let row = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO app_user (user_name, password_hash, user_email, user_description)
            VALUES ($1, $2, $3, $4)
            RETURNING user_id, user_name, user_email, user_description, created_at
            "#,
        )
        .bind(&user.user_name)
        .bind(&user.password_hash)
        .bind(&user.user_email)
        .bind(&user.user_description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_user(&self, user_id: Uuid, user: &UserWrite) -> InfraResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE app_user
            SET user_name = $2,
                password_hash = $3,
                user_email = $4,
                user_description = $5
            WHERE user_id = $1
            RETURNING user_id, user_name, user_email, user_description, created_at
            "#,
        )
        .bind(user_id)
        .bind(&user.user_name)
        .bind(&user.password_hash)
        .bind(&user.user_email)
        .bind(&user.user_description)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_user(&self, user_id: Uuid) -> InfraResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT user_id, user_name, user_email, user_description, created_at
            FROM app_user
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_user(&self, user_id: Uuid) -> InfraResult<u64> {
        let res = sqlx::query(r#"DELETE FROM app_user WHERE user_id = $1"#)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    async fn list_users(&self) -> InfraResult<Vec<UserRecord>> {
        let rows = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT user_id, user_name, user_email, user_description, created_at
            FROM app_user
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_credentials(&self, user_name: &str) -> InfraResult<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, UserCredentials>(
            r#"
            SELECT user_id, password_hash
            FROM app_user
            WHERE user_name = $1
            "#,
        )
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_wraps_fragment() {
        assert_eq!(like_pattern("ann"), "%ann%");
        assert_eq!(like_pattern("  ann "), "%ann%");
    }

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("x\\y"), "%x\\\\y%");
        assert_eq!(like_pattern("\" OR 1=1 --"), "%\" OR 1=1 --%");
    }
}
