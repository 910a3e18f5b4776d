//! AuthoringTool-Trait: gemeinsame Schnittstelle aller Autorenwerkzeuge.

/// Schnittstelle für Platzierungs-, Bearbeitungs- und Auswahlwerkzeuge.
pub trait AuthoringTool {
    /// Anzeigename für Logs
    fn name(&self) -> &str;

    /// Statustext für den Host (z.B. "Startpunkt klicken")
    fn status_text(&self) -> &str;

    /// Läuft gerade eine Eingabe (Session begonnen, aber nicht abgeschlossen)?
    fn is_busy(&self) -> bool;

    /// Tool-Zustand zurücksetzen (Cancel / Tool-Wechsel).
    fn reset(&mut self);
}
