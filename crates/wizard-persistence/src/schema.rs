//! Esquema Diesel (escrito a mano). Reemplazable con `diesel print-schema`.

diesel::table! {
    wizard_states (session_id, wizard_name) {
        session_id -> Uuid,
        wizard_name -> Text,
        schema_version -> Text,
        payload -> Jsonb,
        updated_at -> Timestamptz,
    }
}
