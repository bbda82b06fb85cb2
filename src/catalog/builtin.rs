use super::definition::{WorkflowDefinition, WorkflowKind, WorkflowStep};
use super::locale::LocalizedText;
use crate::shared::ids::StepId;

fn step_id(raw: &str) -> StepId {
    StepId::parse(raw).expect("built-in step id is valid")
}

fn workflow_step(
    id: &str,
    path: &str,
    label: (&str, &str),
    description: (&str, &str),
    required_steps: &[&str],
    estimated_time: u32,
) -> WorkflowStep {
    WorkflowStep {
        id: step_id(id),
        path: path.to_string(),
        label: LocalizedText::new(label.0, label.1),
        description: Some(LocalizedText::new(description.0, description.1)),
        required_steps: required_steps.iter().map(|raw| step_id(raw)).collect(),
        estimated_time: Some(estimated_time),
    }
}

fn tax_optimization() -> WorkflowDefinition {
    WorkflowDefinition {
        id: WorkflowKind::TaxOptimization,
        title: LocalizedText::new("Steueroptimierung", "Tax optimization"),
        description: Some(LocalizedText::new(
            "Abschreibungen und Werbungskosten Ihrer Immobilien steuerlich optimal nutzen.",
            "Make the most of depreciation and deductible expenses on your properties.",
        )),
        steps: vec![
            workflow_step(
                "property-data",
                "/steuern/objektdaten",
                ("Objektdaten erfassen", "Capture property data"),
                (
                    "Kaufpreis, Baujahr und Gebäudeanteil hinterlegen.",
                    "Record purchase price, construction year and building share.",
                ),
                &[],
                10,
            ),
            workflow_step(
                "depreciation",
                "/steuern/afa-rechner",
                ("AfA berechnen", "Calculate depreciation"),
                (
                    "Lineare Gebäudeabschreibung für das Steuerjahr ermitteln.",
                    "Determine straight-line building depreciation for the tax year.",
                ),
                &["property-data"],
                5,
            ),
            workflow_step(
                "expenses",
                "/steuern/werbungskosten",
                ("Werbungskosten erfassen", "Record deductible expenses"),
                (
                    "Zinsen, Verwaltung und Instandhaltung zusammentragen.",
                    "Collect interest, management and maintenance costs.",
                ),
                &["property-data"],
                15,
            ),
            workflow_step(
                "tax-summary",
                "/steuern/uebersicht",
                ("Steuerübersicht prüfen", "Review tax summary"),
                (
                    "Ergebnis aus Vermietung und Verpachtung kontrollieren.",
                    "Check the resulting rental income or loss.",
                ),
                &["depreciation", "expenses"],
                5,
            ),
        ],
    }
}

fn property_management() -> WorkflowDefinition {
    WorkflowDefinition {
        id: WorkflowKind::PropertyManagement,
        title: LocalizedText::new("Immobilienverwaltung", "Property management"),
        description: Some(LocalizedText::new(
            "Objekte, Mieter und Dokumente an einem Ort verwalten.",
            "Manage properties, tenants and documents in one place.",
        )),
        steps: vec![
            workflow_step(
                "add-property",
                "/portfolio/neu",
                ("Immobilie anlegen", "Add property"),
                (
                    "Adresse, Fläche und Kaufdaten erfassen.",
                    "Enter address, floor area and purchase details.",
                ),
                &[],
                10,
            ),
            workflow_step(
                "tenants",
                "/portfolio/mieter",
                ("Mieter hinterlegen", "Add tenants"),
                (
                    "Mietverträge und Kontaktdaten zuordnen.",
                    "Attach leases and contact details.",
                ),
                &["add-property"],
                10,
            ),
            workflow_step(
                "rent-tracking",
                "/portfolio/mieteingaenge",
                ("Mieteingänge verfolgen", "Track rent payments"),
                (
                    "Soll- und Ist-Miete abgleichen.",
                    "Reconcile expected and received rent.",
                ),
                &["tenants"],
                5,
            ),
            workflow_step(
                "documents",
                "/dokumente",
                ("Dokumente ablegen", "File documents"),
                (
                    "Kaufvertrag, Grundbuchauszug und Nebenkostenabrechnungen hochladen.",
                    "Upload the purchase contract, land register extract and utility statements.",
                ),
                &["add-property"],
                10,
            ),
        ],
    }
}

fn financing() -> WorkflowDefinition {
    WorkflowDefinition {
        id: WorkflowKind::Financing,
        title: LocalizedText::new("Finanzierung", "Financing"),
        description: Some(LocalizedText::new(
            "Finanzierungsbedarf ermitteln, Angebote vergleichen und Tilgung planen.",
            "Size the loan, compare offers and plan the repayment.",
        )),
        steps: vec![
            workflow_step(
                "calculator",
                "/finanzierung/rechner",
                ("Finanzierungsrechner", "Mortgage calculator"),
                (
                    "Darlehensbetrag, Zins und Rate berechnen.",
                    "Calculate loan amount, interest and monthly payment.",
                ),
                &[],
                10,
            ),
            workflow_step(
                "offers",
                "/finanzierung/angebote",
                ("Angebote vergleichen", "Compare offers"),
                (
                    "Konditionen verschiedener Banken gegenüberstellen.",
                    "Compare terms from several lenders.",
                ),
                &["calculator"],
                15,
            ),
            workflow_step(
                "tilgung",
                "/finanzierung/tilgungsplan",
                ("Tilgungsplan erstellen", "Build repayment plan"),
                (
                    "Restschuld und Zinsbindung über die Laufzeit planen.",
                    "Plan remaining balance and fixed-rate period over the term.",
                ),
                &["offers"],
                10,
            ),
        ],
    }
}

fn analysis() -> WorkflowDefinition {
    WorkflowDefinition {
        id: WorkflowKind::Analysis,
        title: LocalizedText::new("Analyse", "Analysis"),
        description: Some(LocalizedText::new(
            "Rendite und Marktumfeld eines Objekts bewerten.",
            "Assess the return and market context of a property.",
        )),
        steps: vec![
            workflow_step(
                "market-data",
                "/analyse/markt",
                ("Marktdaten sichten", "Review market data"),
                (
                    "Vergleichsmieten und Kaufpreisfaktoren der Lage prüfen.",
                    "Check comparable rents and price multiples for the location.",
                ),
                &[],
                10,
            ),
            workflow_step(
                "rental-yield",
                "/analyse/mietrendite",
                ("Mietrendite berechnen", "Calculate rental yield"),
                (
                    "Brutto- und Nettomietrendite ermitteln.",
                    "Determine gross and net rental yield.",
                ),
                &["market-data"],
                5,
            ),
            workflow_step(
                "roi",
                "/analyse/roi",
                ("Eigenkapitalrendite berechnen", "Calculate ROI"),
                (
                    "Cashflow und Rendite auf das eingesetzte Eigenkapital ermitteln.",
                    "Determine cash flow and return on invested equity.",
                ),
                &["rental-yield"],
                10,
            ),
            workflow_step(
                "comparison",
                "/analyse/vergleich",
                ("Objekte vergleichen", "Compare properties"),
                (
                    "Kennzahlen mehrerer Objekte nebeneinanderstellen.",
                    "Put key figures of several properties side by side.",
                ),
                &["roi"],
                10,
            ),
        ],
    }
}

pub(crate) fn builtin_workflows() -> Vec<WorkflowDefinition> {
    vec![
        tax_optimization(),
        property_management(),
        financing(),
        analysis(),
    ]
}
