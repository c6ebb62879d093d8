//! Built-in routine set.
//!
//! Restored whenever the repository would otherwise be left empty, and
//! merged underneath whatever the user has persisted.

use indexmap::IndexMap;

use super::{BlockType, Routine, TimeBlock};

pub const DEFAULT_ROUTINE_ID: &str = "Mañana Productiva";
pub const AFTERNOON_FOCUS_ID: &str = "Tarde de Foco";
pub const SPLIT_SHIFT_ID: &str = "Jornada Partida";
pub const PDF_IMPORTED_ID: &str = "Agenda Personal (Importada PDF)";
pub const EL_CAMBIO_ID: &str = "El Cambio";

fn block(id: &str, time: &str, activity: &str, block_type: BlockType) -> TimeBlock {
    TimeBlock::new(id, time, activity, block_type)
}

fn morning_productive() -> Routine {
    use BlockType::*;
    Routine::new(
        DEFAULT_ROUTINE_ID,
        DEFAULT_ROUTINE_ID,
        "Trabajo profundo temprano y tardes libres para la familia.",
    )
    .with_blocks(vec![
        block("mp-1", "06:30", "Despertar e hidratación", Personal),
        block("mp-2", "07:00", "Ejercicio", Personal),
        block("mp-3", "08:00", "Bloque de trabajo profundo", Work),
        block("mp-4", "10:00", "Descanso activo", Break),
        block("mp-5", "10:15", "Reuniones y correo", Work),
        block("mp-6", "13:00", "Comida en familia", Sacred),
        block("mp-7", "14:00", "Tareas ligeras", Work),
        block("mp-8", "16:00", "Tiempo con los hijos", Sacred),
        block("mp-9", "19:00", "Cena y desconexión", Personal),
    ])
}

fn afternoon_focus() -> Routine {
    use BlockType::*;
    Routine::new(
        AFTERNOON_FOCUS_ID,
        AFTERNOON_FOCUS_ID,
        "Mañanas personales y foco concentrado por la tarde.",
    )
    .with_blocks(vec![
        block("af-1", "08:00", "Desayuno tranquilo", Personal),
        block("af-2", "09:00", "Recados y gestiones", Personal),
        block("af-3", "12:00", "Comida", Break),
        block("af-4", "13:00", "Sesión de foco", Work),
        block("af-5", "16:00", "Pausa", Break),
        block("af-6", "16:15", "Sesión de foco II", Work),
        block("af-7", "19:00", "Cena en familia", Sacred),
    ])
}

fn split_shift() -> Routine {
    use BlockType::*;
    Routine::new(
        SPLIT_SHIFT_ID,
        SPLIT_SHIFT_ID,
        "Turno de mañana y tarde con una pausa larga al mediodía.",
    )
    .with_blocks(vec![
        block("ss-1", "07:30", "Preparación", Personal),
        block("ss-2", "08:30", "Turno de mañana", Work),
        block("ss-3", "13:30", "Comida y siesta", Sacred),
        block("ss-4", "16:00", "Turno de tarde", Work),
        block("ss-5", "20:00", "Tiempo en pareja", Sacred),
    ])
}

fn pdf_imported() -> Routine {
    use BlockType::*;
    Routine::new(
        PDF_IMPORTED_ID,
        PDF_IMPORTED_ID,
        "Agenda importada desde el documento personal.",
    )
    .with_blocks(vec![
        block("pdf-1", "06:00", "Rutina matutina", Personal),
        block("pdf-2", "07:00", "Trabajo con IA", Work),
        block("pdf-3", "12:45", "Cierre de sesión IA", Break),
        block("pdf-4", "13:00", "Comida sagrada", Sacred),
        block("pdf-5", "14:00", "Trabajo con IA", Work),
        block("pdf-6", "18:00", "Familia", Sacred),
        block("pdf-7", "21:30", "Lectura", Personal),
    ])
}

fn el_cambio() -> Routine {
    use BlockType::*;
    Routine::new(
        EL_CAMBIO_ID,
        EL_CAMBIO_ID,
        "Rutina de transición: menos pantalla, más presencia.",
    )
    .with_blocks(vec![
        block("ec-1", "06:00", "Meditación", Personal),
        block("ec-2", "06:30", "Caminata", Personal),
        block("ec-3", "08:00", "Trabajo enfocado", Work),
        block("ec-4", "12:00", "Desconexión total", Sacred),
        block("ec-5", "13:00", "Trabajo enfocado", Work),
        block("ec-6", "17:00", "Hobby", Personal),
        block("ec-7", "20:00", "Noche sin pantallas", Sacred),
    ])
}

/// The built-in routines keyed by id, in presentation order.
pub fn builtin_routines() -> IndexMap<String, Routine> {
    [
        morning_productive(),
        afternoon_focus(),
        split_shift(),
        pdf_imported(),
        el_cambio(),
    ]
    .into_iter()
    .map(|r| (r.id.clone(), r))
    .collect()
}
