use medrasti_ast::{Alignment, Direction};

use super::{
    Calendar, ClassNameField, CurrencyPolicy, LabelSide, Labels, Locale, LocaleConfig, Messages,
    MonthNameField,
};

pub static ARABIC: LocaleConfig = LocaleConfig {
    locale: Locale::Ar,
    direction: Direction::Rtl,
    labels: Labels {
        invoice_title: "فاتورة",
        number_prefix: "رقم: ",
        phone_prefix: "الهاتف: ",
        whatsapp_prefix: "واتساب: ",
        school_year_prefix: "السنة الدراسية: ",
        student_section: "معلومات الطالب",
        full_name: ": الاسم الكامل",
        matricule: ": رقم التسجيل",
        class: ": الفصل",
        payment_method: ": طريقة الدفع",
        enrollment_fee: ": رسوم التسجيل",
        payments_section: "تفاصيل الدفع",
        column_month: "الشهر",
        column_total: "المبلغ الإجمالي",
        column_paid: "المبلغ المدفوع",
        column_status: "الحالة",
        total_amount: ": إجمالي المبلغ",
        paid_amount: ": المبلغ المدفوع",
        remaining_amount: ": المبلغ المتبقي",
        generated_on_prefix: "تم إنشاء هذه الفاتورة في: ",
        generated_notice: "تم إنشاء هذه الفاتورة تلقائياً من نظام إدارة المدرسة - Medrasti",
        file_word: "فاتورة",
    },
    messages: Messages {
        missing_identifier: "لم يتم تقديم رقم الفاتورة",
        fetch_failed: "فشل تحميل الفاتورة. يرجى التحقق من رقم الفاتورة.",
        no_data: "لم يتم العثور على بيانات الفاتورة",
        generation_failed: "حدث خطأ أثناء إنشاء ملف PDF. يرجى المحاولة مرة أخرى.",
        unsupported_locale: "اللغة غير مدعومة",
        idle: "في الانتظار",
        fetching: "جارٍ تحميل الفاتورة...",
        generating: "جارٍ إنشاء ملف PDF...",
        downloading: "جارٍ التنزيل...",
        embedding_ready: "المستند جاهز",
        complete: "اكتمل",
    },
    calendar: Calendar {
        tag: "ar-MA",
        short_months: [
            "يناير", "فبراير", "مارس", "أبريل", "ماي", "يونيو", "يوليوز", "غشت", "شتنبر",
            "أكتوبر", "نونبر", "دجنبر",
        ],
    },
    month_name: MonthNameField::Arabic,
    class_name: ClassNameField::ArabicOrName,
    currency: CurrencyPolicy {
        table_rows: None,
        totals: None,
        enrollment_fee: Some("أوقية"),
    },
    label_side: LabelSide::ValueFirst,
    mirrored_table: true,
    header_date: false,
    whatsapp_shows_phone: true,
    bold_values: true,
    footer_align: Alignment::Right,
    status_labels: &[
        ("PAID", "مدفوع"),
        ("UNPAID", "غير مدفوع"),
        ("PARTIALLY_PAID", "مدفوع جزئياً"),
    ],
    method_labels: &[
        ("BANKILY", "بنكيلي"),
        ("CASH", "نقدي"),
        ("MASRIVI", "مصريفي"),
        ("SEDAD", "السداد"),
        ("CLICK", "كليك"),
        ("BIM_BANK", "بيم بنك"),
        ("MOOV_MONEY", "موف موني"),
    ],
};
