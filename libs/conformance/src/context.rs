use zunder_models::Patient;

/// Baseline capture state.
#[derive(Debug, Clone, PartialEq)]
pub enum Baseline {
    NotStarted,
    Captured(Patient),
    Failed(String),
}

/// Per-run state threaded through the cases. The baseline is written once
/// by the read case and only read afterwards.
#[derive(Debug, Clone)]
pub struct SuiteContext {
    patient_id: String,
    baseline: Baseline,
}

impl SuiteContext {
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            baseline: Baseline::NotStarted,
        }
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn state(&self) -> &Baseline {
        &self.baseline
    }

    pub fn baseline(&self) -> Option<&Patient> {
        match &self.baseline {
            Baseline::Captured(patient) => Some(patient),
            _ => None,
        }
    }

    pub(crate) fn capture(&mut self, patient: Patient) {
        if let Baseline::NotStarted = self.baseline {
            self.baseline = Baseline::Captured(patient);
        } else {
            tracing::warn!(patient_id = %self.patient_id, "Baseline already settled, ignoring capture");
        }
    }

    pub(crate) fn fail(&mut self, reason: impl Into<String>) {
        if let Baseline::NotStarted = self.baseline {
            self.baseline = Baseline::Failed(reason.into());
        }
    }
}
