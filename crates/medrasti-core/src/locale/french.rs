use medrasti_ast::{Alignment, Direction};

use super::{
    Calendar, ClassNameField, CurrencyPolicy, LabelSide, Labels, Locale, LocaleConfig, Messages,
    MonthNameField,
};

pub static FRENCH: LocaleConfig = LocaleConfig {
    locale: Locale::Fr,
    direction: Direction::Ltr,
    labels: Labels {
        invoice_title: "FACTURE",
        number_prefix: "N°: ",
        phone_prefix: "Tél: ",
        whatsapp_prefix: "WhatsApp: ",
        school_year_prefix: "Année scolaire: ",
        student_section: "Informations de l'étudiant",
        full_name: "Nom complet:",
        matricule: "Matricule:",
        class: "Classe:",
        payment_method: "Mode de paiement:",
        enrollment_fee: "Frais d'inscription:",
        payments_section: "Détails des paiements",
        column_month: "Mois",
        column_total: "Montant total",
        column_paid: "Montant payé",
        column_status: "Statut",
        total_amount: "Montant total:",
        paid_amount: "Montant payé:",
        remaining_amount: "Montant restant:",
        generated_on_prefix: "Cette facture a été générée le: ",
        generated_notice:
            "Cette facture a été générée automatiquement par le système de gestion scolaire - Medrasti",
        file_word: "facture",
    },
    messages: Messages {
        missing_identifier: "Aucun identifiant de facture fourni",
        fetch_failed:
            "Échec du chargement de la facture. Veuillez vérifier l'identifiant de la facture.",
        no_data: "Aucune donnée de facture trouvée",
        generation_failed: "Erreur lors de la génération du PDF. Veuillez réessayer.",
        unsupported_locale: "Langue non prise en charge",
        idle: "En attente",
        fetching: "Chargement de la facture...",
        generating: "Génération du PDF...",
        downloading: "Téléchargement...",
        embedding_ready: "Document prêt",
        complete: "Terminé",
    },
    calendar: Calendar {
        tag: "fr-FR",
        short_months: [
            "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.",
            "nov.", "déc.",
        ],
    },
    month_name: MonthNameField::French,
    class_name: ClassNameField::Name,
    currency: CurrencyPolicy {
        table_rows: Some("MRU"),
        totals: Some("MRU"),
        enrollment_fee: Some("MRU"),
    },
    label_side: LabelSide::LabelFirst,
    mirrored_table: false,
    header_date: true,
    whatsapp_shows_phone: false,
    bold_values: false,
    footer_align: Alignment::Center,
    status_labels: &[
        ("PAID", "Payé"),
        ("UNPAID", "Non payé"),
        ("PARTIALLY_PAID", "Partiellement payé"),
    ],
    method_labels: &[
        ("BANKILY", "Bankily"),
        ("CASH", "Espèces"),
        ("MASRIVI", "Masrivi"),
        ("SEDAD", "Sedad"),
        ("CLICK", "Click"),
        ("BIM_BANK", "BIM Bank"),
        ("MOOV_MONEY", "Moov Money"),
    ],
};
