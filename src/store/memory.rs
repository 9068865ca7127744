//! In-process `Store` for tests. Mirrors the SQL semantics of `PgStore`,
//! including foreign keys, cascading deletes, case-insensitive name search
//! and result ordering.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use super::Store;
use crate::error::{InfraError, InfraResult};
use crate::models::{
    AppointmentChanges, AppointmentRecord, AppointmentView, NameQuery, NewAppointment,
    PatientChanges, PatientDetails, PatientRecord, UserCredentials, UserRecord, UserWrite,
};

#[derive(Default)]
struct Tables {
    users: Vec<(UserRecord, String)>,
    patients: Vec<PatientRecord>,
    appointments: Vec<AppointmentRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        let mut guard = self.tables.lock().unwrap_or_else(|p| p.into_inner());
        f(&mut guard)
    }
}

impl Tables {
    fn owns_patient(&self, p_id: Uuid, user_id: Uuid) -> bool {
        self.appointments
            .iter()
            .any(|a| a.p_id == p_id && a.user_id == user_id)
    }

    fn view(&self, a: &AppointmentRecord) -> Option<AppointmentView> {
        let p = self.patients.iter().find(|p| p.p_id == a.p_id)?;
        Some(AppointmentView {
            appointment_num: a.appointment_num,
            p_first_name: p.p_first_name.clone(),
            p_last_name: p.p_last_name.clone(),
            doa: a.doa,
            start_time: a.start_time,
            end_time: a.end_time,
            appointment_description: a.appointment_description.clone(),
        })
    }
}

fn by_name(a: &PatientRecord, b: &PatientRecord) -> std::cmp::Ordering {
    (&a.p_last_name, &a.p_first_name, a.p_id).cmp(&(&b.p_last_name, &b.p_first_name, b.p_id))
}

fn name_matches(first: &str, last: &str, query: &NameQuery) -> bool {
    let contains = |hay: &str, needle: &str| {
        hay.to_lowercase()
            .contains(&needle.trim().to_lowercase())
    };
    contains(first, &query.first_name) || contains(last, &query.last_name)
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> InfraResult<()> {
        Ok(())
    }

    async fn patient_exists(&self, p_id: Uuid) -> InfraResult<bool> {
        Ok(self.with(|t| t.patients.iter().any(|p| p.p_id == p_id)))
    }

    async fn patient_booked_by_other_user(&self, p_id: Uuid, user_id: Uuid) -> InfraResult<bool> {
        Ok(self.with(|t| {
            t.appointments
                .iter()
                .any(|a| a.p_id == p_id && a.user_id != user_id)
        }))
    }

    async fn insert_patient(&self, patient: &PatientDetails) -> InfraResult<PatientRecord> {
        let record = PatientRecord {
            p_id: Uuid::new_v4(),
            p_first_name: patient.p_first_name.clone(),
            p_last_name: patient.p_last_name.clone(),
            p_email: patient.p_email.clone(),
            dob: patient.dob,
            phone_number: patient.phone_number.clone(),
        };
        self.with(|t| t.patients.push(record.clone()));
        Ok(record)
    }

    async fn find_owned_patient(
        &self,
        p_id: Uuid,
        user_id: Uuid,
    ) -> InfraResult<Option<PatientRecord>> {
        Ok(self.with(|t| {
            if !t.owns_patient(p_id, user_id) {
                return None;
            }
            t.patients.iter().find(|p| p.p_id == p_id).cloned()
        }))
    }

    async fn update_owned_patient(
        &self,
        changes: &PatientChanges,
    ) -> InfraResult<Option<PatientRecord>> {
        Ok(self.with(|t| {
            if !t.owns_patient(changes.p_id, changes.user_id) {
                return None;
            }
            let p = t.patients.iter_mut().find(|p| p.p_id == changes.p_id)?;
            let d = &changes.details;
            p.p_first_name = d.p_first_name.clone();
            p.p_last_name = d.p_last_name.clone();
            p.p_email = d.p_email.clone();
            p.dob = d.dob;
            p.phone_number = d.phone_number.clone();
            Some(p.clone())
        }))
    }

    async fn delete_patient(&self, p_id: Uuid) -> InfraResult<u64> {
        Ok(self.with(|t| {
            let before = t.patients.len();
            t.patients.retain(|p| p.p_id != p_id);
            t.appointments.retain(|a| a.p_id != p_id);
            (before - t.patients.len()) as u64
        }))
    }

    async fn patients_for_user(&self, user_id: Uuid) -> InfraResult<Vec<PatientRecord>> {
        Ok(self.with(|t| {
            let mut rows: Vec<_> = t
                .patients
                .iter()
                .filter(|p| t.owns_patient(p.p_id, user_id))
                .cloned()
                .collect();
            rows.sort_by(by_name);
            rows
        }))
    }

    async fn search_patients(
        &self,
        user_id: Uuid,
        query: &NameQuery,
    ) -> InfraResult<Vec<PatientRecord>> {
        Ok(self.with(|t| {
            let mut rows: Vec<_> = t
                .patients
                .iter()
                .filter(|p| t.owns_patient(p.p_id, user_id))
                .filter(|p| name_matches(&p.p_first_name, &p.p_last_name, query))
                .cloned()
                .collect();
            rows.sort_by(by_name);
            rows
        }))
    }

    async fn appointments_on_date(
        &self,
        user_id: Uuid,
        doa: NaiveDate,
    ) -> InfraResult<Vec<AppointmentRecord>> {
        Ok(self.with(|t| {
            let mut rows: Vec<_> = t
                .appointments
                .iter()
                .filter(|a| a.user_id == user_id && a.doa == doa)
                .cloned()
                .collect();
            rows.sort_by_key(|a| a.start_time);
            rows
        }))
    }

    async fn insert_appointment(&self, appointment: &NewAppointment) -> InfraResult<Uuid> {
        let appointment_num = Uuid::new_v4();
        self.with(|t| {
            // foreign keys
            if !t.users.iter().any(|(u, _)| u.user_id == appointment.user_id) {
                return Err(InfraError::MissingRow("app_user"));
            }
            if !t.patients.iter().any(|p| p.p_id == appointment.p_id) {
                return Err(InfraError::MissingRow("patient"));
            }
            t.appointments.push(AppointmentRecord {
                appointment_num,
                doa: appointment.doa,
                start_time: appointment.start_time,
                end_time: appointment.end_time,
                appointment_description: appointment.appointment_description.clone(),
                p_id: appointment.p_id,
                user_id: appointment.user_id,
            });
            Ok(())
        })?;
        Ok(appointment_num)
    }

    async fn update_appointment(&self, changes: &AppointmentChanges) -> InfraResult<u64> {
        Ok(self.with(|t| {
            let Some(a) = t.appointments.iter_mut().find(|a| {
                a.appointment_num == changes.appointment_num && a.user_id == changes.user_id
            }) else {
                return 0;
            };
            a.doa = changes.doa;
            a.start_time = changes.start_time;
            a.end_time = changes.end_time;
            a.appointment_description = changes.appointment_description.clone();
            1
        }))
    }

    async fn find_appointment(
        &self,
        appointment_num: Uuid,
        user_id: Uuid,
    ) -> InfraResult<Option<AppointmentRecord>> {
        Ok(self.with(|t| {
            t.appointments
                .iter()
                .find(|a| a.appointment_num == appointment_num && a.user_id == user_id)
                .cloned()
        }))
    }

    async fn appointment_view(
        &self,
        appointment_num: Uuid,
        user_id: Uuid,
    ) -> InfraResult<Option<AppointmentView>> {
        Ok(self.with(|t| {
            t.appointments
                .iter()
                .find(|a| a.appointment_num == appointment_num && a.user_id == user_id)
                .and_then(|a| t.view(a))
        }))
    }

    async fn delete_appointment(&self, appointment_num: Uuid, user_id: Uuid) -> InfraResult<u64> {
        Ok(self.with(|t| {
            let before = t.appointments.len();
            t.appointments
                .retain(|a| !(a.appointment_num == appointment_num && a.user_id == user_id));
            (before - t.appointments.len()) as u64
        }))
    }

    async fn appointments_for_user(&self, user_id: Uuid) -> InfraResult<Vec<AppointmentRecord>> {
        Ok(self.with(|t| {
            let mut rows: Vec<_> = t
                .appointments
                .iter()
                .filter(|a| a.user_id == user_id)
                .cloned()
                .collect();
            rows.sort_by_key(|a| (a.doa, a.start_time));
            rows
        }))
    }

    async fn appointment_views_on_date(
        &self,
        user_id: Uuid,
        doa: NaiveDate,
    ) -> InfraResult<Vec<AppointmentView>> {
        Ok(self.with(|t| {
            let mut rows: Vec<_> = t
                .appointments
                .iter()
                .filter(|a| a.user_id == user_id && a.doa == doa)
                .filter_map(|a| t.view(a))
                .collect();
            rows.sort_by_key(|v| v.start_time);
            rows
        }))
    }

    async fn search_appointment_views(
        &self,
        user_id: Uuid,
        query: &NameQuery,
    ) -> InfraResult<Vec<AppointmentView>> {
        Ok(self.with(|t| {
            let mut rows: Vec<_> = t
                .appointments
                .iter()
                .filter(|a| a.user_id == user_id)
                .filter_map(|a| t.view(a))
                .filter(|v| name_matches(&v.p_first_name, &v.p_last_name, query))
                .collect();
            rows.sort_by_key(|v| (v.doa, v.start_time));
            rows
        }))
    }

    async fn user_exists(&self, user_id: Uuid) -> InfraResult<bool> {
        Ok(self.with(|t| t.users.iter().any(|(u, _)| u.user_id == user_id)))
    }

    async fn user_name_taken(&self, user_name: &str, except: Option<Uuid>) -> InfraResult<bool> {
        Ok(self.with(|t| {
            t.users
                .iter()
                .any(|(u, _)| u.user_name == user_name && Some(u.user_id) != except)
        }))
    }

    async fn insert_user(&self, user: &UserWrite) -> InfraResult<UserRecord> {
        let record = UserRecord {
            user_id: Uuid::new_v4(),
            user_name: user.user_name.clone(),
            user_email: user.user_email.clone(),
            user_description: user.user_description.clone(),
            created_at: Utc::now(),
        };
        self.with(|t| t.users.push((record.clone(), user.password_hash.clone())));
        Ok(record)
    }

    async fn update_user(&self, user_id: Uuid, user: &UserWrite) -> InfraResult<Option<UserRecord>> {
        Ok(self.with(|t| {
            let (record, hash) = t.users.iter_mut().find(|(u, _)| u.user_id == user_id)?;
            record.user_name = user.user_name.clone();
            record.user_email = user.user_email.clone();
            record.user_description = user.user_description.clone();
            *hash = user.password_hash.clone();
            Some(record.clone())
        }))
    }

    async fn find_user(&self, user_id: Uuid) -> InfraResult<Option<UserRecord>> {
        Ok(self.with(|t| {
            t.users
                .iter()
                .find(|(u, _)| u.user_id == user_id)
                .map(|(u, _)| u.clone())
        }))
    }

    async fn delete_user(&self, user_id: Uuid) -> InfraResult<u64> {
        Ok(self.with(|t| {
            let before = t.users.len();
            t.users.retain(|(u, _)| u.user_id != user_id);
            t.appointments.retain(|a| a.user_id != user_id);
            (before - t.users.len()) as u64
        }))
    }

    async fn list_users(&self) -> InfraResult<Vec<UserRecord>> {
        Ok(self.with(|t| {
            let mut rows: Vec<_> = t.users.iter().map(|(u, _)| u.clone()).collect();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            rows
        }))
    }

    async fn find_credentials(&self, user_name: &str) -> InfraResult<Option<UserCredentials>> {
        Ok(self.with(|t| {
            t.users
                .iter()
                .find(|(u, _)| u.user_name == user_name)
                .map(|(u, hash)| UserCredentials {
                    user_id: u.user_id,
                    password_hash: hash.clone(),
                })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{booking, date, seed_patient, seed_user, t};

    #[tokio::test]
    async fn appointment_insert_requires_existing_user_and_patient() {
        let store = MemoryStore::new();
        let alice = seed_user(&store, "alice").await;
        let ann = seed_patient(&store, "Ann", "Smith").await;

        let ghost_user = booking(Uuid::new_v4(), ann, date(2024, 3, 15), t(9, 0), t(10, 0));
        assert!(matches!(
            store.insert_appointment(&ghost_user).await,
            Err(InfraError::MissingRow("app_user"))
        ));

        let ghost_patient = booking(alice, Uuid::new_v4(), date(2024, 3, 15), t(9, 0), t(10, 0));
        assert!(matches!(
            store.insert_appointment(&ghost_patient).await,
            Err(InfraError::MissingRow("patient"))
        ));

        assert!(store.appointments_for_user(alice).await.unwrap().is_empty());
        assert!(!store.patient_booked_by_other_user(ann, alice).await.unwrap());
    }

    #[tokio::test]
    async fn patients_come_back_ordered_by_last_then_first_name() {
        let store = MemoryStore::new();
        let alice = seed_user(&store, "alice").await;
        let zoe = seed_patient(&store, "Zoe", "Young").await;
        let carl = seed_patient(&store, "Carl", "Brown").await;
        let adam = seed_patient(&store, "Adam", "Brown").await;
        for (p_id, hour) in [(zoe, 9), (carl, 10), (adam, 11)] {
            store
                .insert_appointment(&booking(alice, p_id, date(2024, 3, 15), t(hour, 0), t(hour, 30)))
                .await
                .unwrap();
        }

        let listed: Vec<Uuid> = store
            .patients_for_user(alice)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.p_id)
            .collect();
        assert_eq!(listed, vec![adam, carl, zoe]);

        let query = NameQuery {
            first_name: "a".into(),
            last_name: "n".into(),
        };
        let found: Vec<Uuid> = store
            .search_patients(alice, &query)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.p_id)
            .collect();
        assert_eq!(found, vec![adam, carl, zoe]);
    }
}
