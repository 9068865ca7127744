pub mod appointments;
pub mod patients;
pub mod users;

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, NaiveTime};
    use uuid::Uuid;

    use crate::models::{NewAppointment, PatientDetails, UserWrite};
    use crate::store::Store;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    pub fn patient_details(first: &str, last: &str) -> PatientDetails {
        PatientDetails {
            p_first_name: first.into(),
            p_last_name: last.into(),
            p_email: format!("{}@example.com", first.to_lowercase()),
            dob: date(1990, 1, 1),
            phone_number: "+15550100".into(),
        }
    }

    pub async fn seed_user(store: &dyn Store, name: &str) -> Uuid {
        store
            .insert_user(&UserWrite {
                user_name: name.into(),
                password_hash: "unused".into(),
                user_email: format!("{name}@clinic.test"),
                user_description: "clinician".into(),
            })
            .await
            .unwrap()
            .user_id
    }

    pub async fn seed_patient(store: &dyn Store, first: &str, last: &str) -> Uuid {
        store
            .insert_patient(&patient_details(first, last))
            .await
            .unwrap()
            .p_id
    }

    pub fn booking(
        user_id: Uuid,
        p_id: Uuid,
        doa: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> NewAppointment {
        NewAppointment {
            doa,
            start_time: start,
            end_time: end,
            appointment_description: "consultation".into(),
            p_id,
            user_id,
        }
    }
}
