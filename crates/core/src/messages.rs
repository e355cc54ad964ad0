//! User-facing strings (French, as shown on the page) and the notice type
//! the loader appends to the wrapper element.

pub const STARTED_TEXT: &str = "fetch démarré...";
pub const CANVAS_NOT_FOUND: &str = "Canvas introuvable pour le graphique";

pub const STARTED_CLASS: &str = "text-xs text-gray-400 dark:text-gray-500 mt-1";
pub const ERROR_CLASS: &str = "text-sm text-red-500";
pub const RENDER_ERROR_CLASS: &str = "text-sm text-red-500 mt-2";

pub const DEFAULT_X_LABEL: &str = "Nombre d'itérations / quantité de travail";
pub const DEFAULT_Y_LABEL: &str = "Qualité du résultat";
pub const DATASET_LABEL: &str = "Valeurs";

/// A text node appended to the wrapper, with its CSS classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Element id, only set for notices that get removed later
    pub id: Option<String>,
    pub text: String,
    pub class: &'static str,
}

impl Notice {
    pub fn error(text: String) -> Self {
        Self {
            id: None,
            text,
            class: ERROR_CLASS,
        }
    }

    pub fn render_error(text: String) -> Self {
        Self {
            id: None,
            text,
            class: RENDER_ERROR_CLASS,
        }
    }

    /// The transient "started" marker for a canvas.
    pub fn started(marker_id: String) -> Self {
        Self {
            id: Some(marker_id),
            text: STARTED_TEXT.to_string(),
            class: STARTED_CLASS,
        }
    }

    pub fn is_error(&self) -> bool {
        self.class != STARTED_CLASS
    }
}

pub fn http_failure(status: u16, body: &str) -> String {
    format!("Impossible de charger le graphique (status {}) {}", status, body)
}

pub fn load_failure(detail: &str) -> String {
    format!("Erreur lors du chargement du graphique: {}", detail)
}

pub fn render_failure(detail: &str) -> String {
    format!("Erreur lors du rendu du graphique: {}", detail)
}

pub fn library_unavailable(library: &str) -> String {
    format!("{} non chargé", library)
}

pub fn loading(answer_id: &str) -> String {
    format!("Chargement graphique id {}...", answer_id)
}

pub fn received(answer_id: &str) -> String {
    format!("Données reçues pour id {}", answer_id)
}
