//! Dashboard view state: the views, the bounded history stack and the
//! patient transition rules.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A view inside the patient dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum View {
    Welcome,
    SelectCenter,
    SelectDoctor,
    BookAppointment,
    ManageAppointments,
    UnderConstruction(String),
}

impl View {
    pub fn slug(&self) -> &str {
        match self {
            View::Welcome => "welcome",
            View::SelectCenter => "select-center",
            View::SelectDoctor => "select-doctor",
            View::BookAppointment => "agendar-cita",
            View::ManageAppointments => "gestionar-citas",
            View::UnderConstruction(slug) => slug,
        }
    }

    pub fn from_slug(slug: &str) -> Self {
        match slug {
            "" | "welcome" => View::Welcome,
            "select-center" => View::SelectCenter,
            "select-doctor" => View::SelectDoctor,
            "agendar-cita" => View::BookAppointment,
            "gestionar-citas" => View::ManageAppointments,
            other => View::UnderConstruction(other.to_string()),
        }
    }

    /// Map a menu path such as `/paciente/agendar-cita` by its last segment.
    pub fn from_path(path: &str) -> Self {
        Self::from_slug(last_segment(path))
    }

    pub fn title(&self) -> &str {
        match self {
            View::Welcome => "Bienvenida",
            View::SelectCenter => "Seleccionar centro",
            View::SelectDoctor => "Seleccionar especialidad",
            View::BookAppointment => "Agendar cita",
            View::ManageAppointments => "Gestionar citas",
            View::UnderConstruction(_) => "En construcción",
        }
    }
}

fn last_segment(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or("")
}

/// Navigation history with a fixed depth. The oldest entry is evicted when
/// full and pushing the current view again is a no-op.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewStack {
    entries: Vec<View>,
    max_depth: usize,
}

impl Default for ViewStack {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ViewStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            entries: vec![View::Welcome],
            max_depth: max_depth.max(1),
        }
    }

    pub fn current(&self) -> &View {
        self.entries.last().unwrap_or(&View::Welcome)
    }

    pub fn entries(&self) -> &[View] {
        &self.entries
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn push(&mut self, view: View) {
        if self.entries.last() == Some(&view) {
            return;
        }
        self.entries.push(view);
        if self.entries.len() > self.max_depth {
            let excess = self.entries.len() - self.max_depth;
            self.entries.drain(..excess);
        }
    }

    /// Step back one entry. From a single entry the stack resets to `Welcome`.
    pub fn pop(&mut self) -> &View {
        if self.entries.len() > 1 {
            self.entries.pop();
        } else {
            self.entries = vec![View::Welcome];
        }
        self.current()
    }

    /// Show `view` in place of the current entry.
    pub fn replace_current(&mut self, view: View) {
        match self.entries.last_mut() {
            Some(last) => *last = view,
            None => self.entries.push(view),
        }
    }
}

/// Patient dashboard navigation: the stack plus reschedule mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientNavigation {
    stack: ViewStack,
    rescheduling: Option<Uuid>,
}

impl PatientNavigation {
    pub fn new(max_depth: usize) -> Self {
        Self {
            stack: ViewStack::new(max_depth),
            rescheduling: None,
        }
    }

    pub fn current(&self) -> &View {
        self.stack.current()
    }

    pub fn stack(&self) -> &ViewStack {
        &self.stack
    }

    /// Local id of the appointment being rescheduled, if any.
    pub fn rescheduling(&self) -> Option<Uuid> {
        self.rescheduling
    }

    pub fn set_rescheduling(&mut self, id: Option<Uuid>) {
        self.rescheduling = id;
    }

    /// Apply the selection guards and push the resulting view.
    pub fn navigate(&mut self, requested: View, has_center: bool, has_doctor: bool) -> &View {
        let target = resolve(requested, has_center, has_doctor);
        if target != View::BookAppointment {
            self.rescheduling = None;
        }
        self.stack.push(target);
        self.stack.current()
    }

    pub fn go_back(&mut self) -> &View {
        let view = self.stack.pop().clone();
        if view != View::BookAppointment {
            self.rescheduling = None;
        }
        self.stack.current()
    }

    /// Switch views without recording history.
    pub fn show(&mut self, view: View) {
        if view != View::BookAppointment {
            self.rescheduling = None;
        }
        self.stack.replace_current(view);
    }
}

/// Redirect a request to the first view whose preconditions are met.
pub fn resolve(requested: View, has_center: bool, has_doctor: bool) -> View {
    match requested {
        View::BookAppointment if !has_center => View::SelectCenter,
        View::BookAppointment if !has_doctor => View::SelectDoctor,
        View::SelectDoctor if !has_center => View::SelectCenter,
        other => other,
    }
}

/// What the doctor dashboard shows for a menu path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoctorView {
    Agenda,
    UnderConstruction(String),
}

impl DoctorView {
    pub fn from_path(path: &str) -> Self {
        match last_segment(path) {
            "" | "agenda" | "citas-hoy" => DoctorView::Agenda,
            other => DoctorView::UnderConstruction(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuLink {
    pub name: &'static str,
    pub path: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSection {
    pub title: &'static str,
    pub links: Vec<MenuLink>,
}

fn section(title: &'static str, links: &[(&'static str, &'static str)]) -> MenuSection {
    MenuSection {
        title,
        links: links
            .iter()
            .map(|&(name, path)| MenuLink { name, path })
            .collect(),
    }
}

pub fn patient_menu() -> Vec<MenuSection> {
    vec![
        section(
            "1. Citas médicas",
            &[
                ("Agendar cita", "/paciente/agendar-cita"),
                ("Gestionar citas", "/paciente/gestionar-citas"),
                ("Historial de citas", "/paciente/historial-citas"),
                ("Recordatorios automáticos", "/paciente/recordatorios"),
            ],
        ),
        section(
            "2. Resultados e informes médicos",
            &[
                ("Análisis clínicos y de laboratorio", "/paciente/analisis"),
                ("Informes de radiología o diagnóstico", "/paciente/radiologia"),
                ("Informes de alta hospitalaria", "/paciente/alta"),
                ("Historial médico completo", "/paciente/historial-medico"),
            ],
        ),
        section(
            "3. Prescripciones y medicación",
            &[
                ("Visualizar recetas activas", "/paciente/recetas-activas"),
                ("Descargar receta electrónica", "/paciente/descargar-receta"),
                ("Solicitar renovación o revisión", "/paciente/solicitar-renovacion"),
                ("Historial de medicación", "/paciente/historial-medicacion"),
            ],
        ),
        section(
            "4. Facturación y seguros",
            &[
                ("Visualizar facturas", "/paciente/facturas"),
                ("Realizar pagos online", "/paciente/pagos"),
                ("Consultar cobertura o aseguradora", "/paciente/cobertura"),
            ],
        ),
        section(
            "5. Comunicación directa",
            &[
                ("Mensajería segura con el médico", "/paciente/mensajeria"),
                ("Solicitudes administrativas", "/paciente/solicitudes-adm"),
                ("Alertas o notificaciones del hospital", "/paciente/alertas"),
            ],
        ),
        section(
            "6. Documentos personales",
            &[
                ("Subir documentos externos", "/paciente/subir-docs"),
                ("Descargar documentos del hospital", "/paciente/descargar-docs"),
            ],
        ),
        section(
            "7. Perfil y configuración",
            &[
                ("Datos personales y de contacto", "/paciente/datos-personales"),
                ("Preferencias de notificación", "/paciente/preferencias"),
                ("Gestión de contraseñas y seguridad", "/paciente/seguridad"),
                ("Seleccionar/Cambiar Centro", "/paciente/select-center"),
            ],
        ),
    ]
}

pub fn doctor_menu() -> Vec<MenuSection> {
    vec![
        section(
            "1. Agenda y citas",
            &[
                ("Calendario personal y de consultas", "/medico/agenda"),
                ("Listado de pacientes citados", "/medico/citas-hoy"),
                ("Reprogramar o cancelar citas", "/medico/modificar-cita"),
                ("Disponibilidad automática", "/medico/bloquear-horas"),
            ],
        ),
        section(
            "2. Información de pacientes",
            &[
                ("Notas médicas y evolución", "/medico/notas"),
                ("Resultados de laboratorio o pruebas", "/medico/resultados"),
                ("Adjuntar documentos o imágenes", "/medico/adjuntar-docs"),
                ("Ver prescripciones anteriores", "/medico/prescripciones-previas"),
            ],
        ),
        section(
            "3. Gestión de prescripciones",
            &[
                ("Emitir o renovar recetas electrónicas", "/medico/emitir-receta"),
                ("Registrar tratamientos", "/medico/registrar-tratamiento"),
                ("Consultar alergias o contraindicaciones", "/medico/alergias"),
            ],
        ),
        section(
            "4. Comunicación",
            &[
                ("Mensajería interna con pacientes y colegas", "/medico/mensajeria"),
                ("Consultas interdepartamentales", "/medico/consultas-inter"),
            ],
        ),
        section(
            "5. Reportes y estadísticas",
            &[
                ("Pacientes atendidos por día / mes", "/medico/reporte-atendidos"),
                ("Tasa de ausencias (no-shows)", "/medico/tasa-ausencias"),
                ("Carga de trabajo semanal o mensual", "/medico/carga-trabajo"),
            ],
        ),
        section(
            "6. Administración y perfil",
            &[
                ("Gestión de horarios y disponibilidad", "/medico/gestion-horarios"),
                ("Actualización de datos profesionales", "/medico/perfil"),
                ("Preferencias de notificación o agenda", "/medico/config-notif"),
            ],
        ),
    ]
}
