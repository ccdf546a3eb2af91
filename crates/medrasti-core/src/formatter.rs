//! Invoice record to document tree
//!
//! One template serves both languages. Everything that differs between
//! them is read from the active [`LocaleConfig`]; blocks are emitted in
//! visual left-to-right order, so a mirrored variant simply reverses the
//! cells of its rows.

use chrono::NaiveDate;
use medrasti_ast::{
    Alignment, Block, Border, Color, Document, FontFamily, FontWeight, Image, Row, RowCell, Rule,
    Stack, Table, TableCell, TableRow, TextStyle,
};
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{SchoolSettings, Settings};
use crate::error::FormatError;
use crate::format::{format_amount, format_date, format_day};
use crate::locale::{AmountPlace, LabelSide, Locale, LocaleConfig};
use crate::model::{Enrollment, InvoiceRecord, MonthPaymentRow, PaymentStatus, Student, Totals};

mod palette {
    use medrasti_ast::Color;

    pub const ACCENT: Color = Color::hex(0x3b82f6);
    pub const TITLE: Color = Color::hex(0x1e40af);
    pub const MUTED: Color = Color::hex(0x4b5563);
    pub const PANEL_FILL: Color = Color::hex(0xf9fafb);
    pub const PANEL_BORDER: Color = Color::hex(0xe5e7eb);
    pub const TABLE_BORDER: Color = Color::hex(0xe2e8f0);
    pub const TABLE_HEADER: Color = Color::hex(0xf3f4f6);
    pub const TABLE_STRIPE: Color = Color::hex(0xf8fafc);
    pub const PAID: Color = Color::hex(0x10b981);
    pub const UNPAID: Color = Color::hex(0xef4444);
    pub const PARTIAL: Color = Color::hex(0xf59e0b);
}

const LOGO_SIZE: f32 = 50.0;

/// Builds invoice documents for a given school identity and font
#[derive(Debug, Clone)]
pub struct InvoiceFormatter {
    school: SchoolSettings,
    font: FontFamily,
}

impl InvoiceFormatter {
    pub fn new(school: SchoolSettings, font: FontFamily) -> Self {
        Self { school, font }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.school.clone(), settings.fonts.family())
    }

    /// Map a record to the document of the given locale
    ///
    /// The result depends only on the arguments. `generated_on` is the
    /// date printed in the footer.
    pub fn format(
        &self,
        record: &InvoiceRecord,
        locale: Locale,
        generated_on: NaiveDate,
    ) -> Result<Document, FormatError> {
        let enrollment = record
            .enrollement
            .as_ref()
            .ok_or(FormatError::MissingField("enrollement"))?;
        let student = enrollment
            .student
            .as_ref()
            .ok_or(FormatError::MissingField("enrollement.student"))?;
        let rows = record
            .month_invoice_relations
            .as_deref()
            .ok_or(FormatError::MissingField("monthInvoiceRelations"))?;
        let totals = Totals::of(rows).ok_or(FormatError::AmountOutOfRange)?;

        let layout = Layout {
            cfg: locale.config(),
            record,
            enrollment,
            student,
            rows,
            totals,
            school: self.school.merged_with(record.school.as_ref()),
        };

        let mut doc = Document::new(layout.cfg.direction, self.font.clone());
        doc.metadata.title = Some(
            format!("{} {}", layout.cfg.labels.invoice_title, record.reference)
                .trim()
                .to_string(),
        );
        doc.metadata.author = Some(layout.school_name().to_string());
        doc.metadata.lang = Some(locale.tag().to_string());

        doc.blocks.extend(layout.header());
        doc.push(layout.info_block());
        doc.footer = layout.footer(generated_on);

        debug!(
            invoice = %record.reference,
            locale = %locale,
            rows = rows.len(),
            "formatted invoice document"
        );
        Ok(doc)
    }
}

struct Layout<'a> {
    cfg: &'static LocaleConfig,
    record: &'a InvoiceRecord,
    enrollment: &'a Enrollment,
    student: &'a Student,
    rows: &'a [MonthPaymentRow],
    totals: Totals,
    school: SchoolSettings,
}

impl Layout<'_> {
    fn start(&self) -> Alignment {
        self.cfg.direction.start()
    }

    fn end(&self) -> Alignment {
        self.cfg.direction.end()
    }

    fn school_name(&self) -> &str {
        match self.cfg.locale {
            Locale::Fr => &self.school.name,
            Locale::Ar => &self.school.arabic_name,
        }
    }

    /// Order cells for display: listed in reading order, flipped when mirrored
    fn ordered<T>(&self, mut cells: Vec<T>) -> Vec<T> {
        if self.cfg.direction.is_rtl() {
            cells.reverse();
        }
        cells
    }

    fn amount(&self, value: Decimal, place: AmountPlace) -> String {
        format_amount(value, self.cfg.currency.suffix(place))
    }

    fn value_style(&self) -> TextStyle {
        let style = TextStyle::new(9.0).align(Alignment::Right);
        if self.cfg.bold_values {
            style.bold()
        } else {
            style
        }
    }

    fn section_title(&self, text: &str) -> Block {
        Block::text(
            text,
            TextStyle::new(12.0)
                .bold()
                .color(palette::TITLE)
                .align(self.start()),
        )
    }

    fn header(&self) -> Vec<Block> {
        let labels = &self.cfg.labels;

        let mut identity = vec![Block::text(
            self.school_name(),
            TextStyle::new(13.0).bold().align(self.start()),
        )];
        if let Some(address) = non_empty(&self.school.address) {
            identity.push(Block::text(address, self.detail_style()));
        }

        let tel = non_empty(&self.school.tel);
        let mut contacts = Vec::new();
        if let Some(tel) = tel {
            contacts.push(RowCell::new(vec![Block::text(
                format!("{}{}", labels.phone_prefix, tel),
                self.detail_style(),
            )]));
        }
        if let Some(whatsapp) = non_empty(&self.school.whatsapp) {
            let shown = if self.cfg.whatsapp_shows_phone {
                tel.unwrap_or_default()
            } else {
                whatsapp
            };
            contacts.push(RowCell::new(vec![Block::text(
                format!("{}{}", labels.whatsapp_prefix, shown),
                self.detail_style(),
            )]));
        }
        if !contacts.is_empty() {
            identity.push(Block::Row(
                Row::new(self.ordered(contacts)).gap(8.0).align(self.start()),
            ));
        }
        identity.push(Block::Spacer(2.0));
        identity.push(Block::text(
            format!("{}{}", labels.school_year_prefix, self.enrollment.year),
            self.detail_style(),
        ));

        let mut invoice_info = vec![
            Block::text(
                labels.invoice_title,
                TextStyle::new(16.0)
                    .bold()
                    .color(palette::TITLE)
                    .align(Alignment::Right),
            ),
            Block::text(
                format!("{}{}", labels.number_prefix, self.record.reference),
                TextStyle::new(10.0).line_height(1.3).align(Alignment::Right),
            ),
        ];
        if self.cfg.header_date {
            invoice_info.push(Block::text(
                format_date(&self.record.created_at, &self.cfg.calendar),
                TextStyle::new(9.0)
                    .color(palette::MUTED)
                    .line_height(1.3)
                    .align(Alignment::Right),
            ));
        }

        let mut cells = Vec::new();
        if let Some(logo) = non_empty(&self.school.logo_url) {
            cells.push(RowCell::new(vec![Block::Image(Image {
                src: logo.to_string(),
                width: LOGO_SIZE,
                height: LOGO_SIZE,
            })]));
        }
        cells.push(RowCell::flex(identity));
        cells.push(RowCell::percent(35.0, invoice_info));

        vec![
            Block::Row(Row::new(self.ordered(cells)).gap(10.0)),
            Block::Spacer(8.0),
            Block::Rule(Rule {
                border: Border::new(2.0, palette::ACCENT),
                spacing_after: 12.0,
            }),
        ]
    }

    fn detail_style(&self) -> TextStyle {
        TextStyle::new(9.0).bold().align(self.start())
    }

    fn info_row(&self, label: &str, value: impl Into<String>, value_style: TextStyle) -> Row {
        let label = RowCell::percent(
            40.0,
            vec![Block::text(
                label,
                TextStyle::new(9.0).bold().align(self.start()),
            )],
        );
        let value = RowCell::percent(60.0, vec![Block::text(value, value_style)]);
        let cells = match self.cfg.label_side {
            LabelSide::LabelFirst => vec![label, value],
            LabelSide::ValueFirst => vec![value, label],
        };
        Row {
            spacing_before: 2.0,
            ..Row::new(cells)
        }
    }

    fn info_block(&self) -> Block {
        let labels = &self.cfg.labels;
        let mut panel = Stack {
            fill: Some(palette::PANEL_FILL),
            border: Some(Border::new(1.0, palette::PANEL_BORDER)),
            radius: 8.0,
            padding: 8.0,
            spacing_after: 8.0,
            ..Stack::default()
        };

        panel.push(self.section_title(labels.student_section));
        panel.push(Block::Spacer(6.0));
        panel.push(Block::Row(self.info_row(
            labels.full_name,
            self.student.full_name(),
            self.value_style(),
        )));
        panel.push(Block::Row(self.info_row(
            labels.matricule,
            self.student.matricule.as_str(),
            self.value_style(),
        )));
        panel.push(Block::Row(self.info_row(
            labels.class,
            self.cfg.class_name(&self.enrollment.school_class),
            self.value_style(),
        )));
        panel.push(Block::Row(self.info_row(
            labels.payment_method,
            self.cfg.method_label(&self.record.payment_method),
            self.value_style(),
        )));

        let fee = self.enrollment.enrollement_price;
        if fee > Decimal::ZERO {
            let mut row = self.info_row(
                labels.enrollment_fee,
                self.amount(fee, AmountPlace::EnrollmentFee),
                self.value_style().bold().color(palette::TITLE),
            );
            row.spacing_before = 4.0;
            row.top_border = Some(Border::new(1.0, palette::PANEL_BORDER));
            panel.push(Block::Row(row));
        }

        panel.push(Block::Spacer(10.0));
        panel.push(self.section_title(labels.payments_section));
        panel.push(Block::Spacer(6.0));
        panel.push(Block::Table(self.payment_table()));

        let totals = self.totals;
        let remaining_color = if totals.remaining > Decimal::ZERO {
            palette::UNPAID
        } else {
            palette::PAID
        };
        panel.push(Block::Row(self.totals_row(
            labels.total_amount,
            self.amount(totals.total, AmountPlace::Totals),
            Color::BLACK,
        )));
        panel.push(Block::Row(self.totals_row(
            labels.paid_amount,
            self.amount(totals.paid, AmountPlace::Totals),
            palette::PAID,
        )));
        panel.push(Block::Row(self.totals_row(
            labels.remaining_amount,
            self.amount(totals.remaining, AmountPlace::Totals),
            remaining_color,
        )));

        Block::Stack(panel)
    }

    fn payment_table(&self) -> Table {
        let labels = &self.cfg.labels;
        let header_style = TextStyle::new(8.0).bold().align(Alignment::Center);
        let header = [
            labels.column_month,
            labels.column_total,
            labels.column_paid,
            labels.column_status,
        ]
        .into_iter()
        .map(|label| TableCell::new(label, header_style))
        .collect();

        let mut cell_style = TextStyle::new(8.0)
            .align(Alignment::Center)
            .line_height(1.2);
        if self.cfg.bold_values {
            cell_style = cell_style.weight(FontWeight::Bold);
        }

        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let cells = vec![
                    TableCell::new(self.cfg.month_name(row.month()), cell_style),
                    TableCell::new(
                        self.amount(row.total_amount, AmountPlace::TableRow),
                        cell_style,
                    ),
                    TableCell::new(
                        self.amount(row.paid_amount, AmountPlace::TableRow),
                        cell_style,
                    ),
                    TableCell::new(
                        self.cfg.status_label(&row.status),
                        cell_style.color(status_color(&row.status)),
                    ),
                ];
                TableRow {
                    cells: self.table_order(cells),
                    fill: (index % 2 == 0).then_some(palette::TABLE_STRIPE),
                }
            })
            .collect();

        Table {
            columns: vec![25.0; 4],
            header: self.table_order(header),
            header_fill: Some(palette::TABLE_HEADER),
            rows,
            border: Some(Border::new(1.0, palette::TABLE_BORDER)),
        }
    }

    fn table_order<T>(&self, mut cells: Vec<T>) -> Vec<T> {
        if self.cfg.mirrored_table {
            cells.reverse();
        }
        cells
    }

    fn totals_row(&self, label: &str, value: String, color: Color) -> Row {
        let label_style = TextStyle::new(9.0).bold().align(self.start());
        let value_style = TextStyle::new(9.0).bold().color(color).align(self.end());
        let cells = match self.cfg.label_side {
            LabelSide::LabelFirst => vec![
                RowCell::flex(vec![Block::text(label, label_style)]),
                RowCell::new(vec![Block::text(value, value_style)]),
            ],
            LabelSide::ValueFirst => vec![
                RowCell::flex(vec![Block::text(value, value_style)]),
                RowCell::new(vec![Block::text(label, label_style)]),
            ],
        };
        Row {
            spacing_before: 8.0,
            ..Row::new(cells)
        }
    }

    fn footer(&self, generated_on: NaiveDate) -> Vec<Block> {
        let labels = &self.cfg.labels;
        let style = TextStyle::new(8.0)
            .line_height(1.2)
            .align(self.cfg.footer_align);
        vec![
            Block::Rule(Rule {
                border: Border::new(1.0, palette::TABLE_BORDER),
                spacing_after: 8.0,
            }),
            Block::text(
                format!(
                    "{}{}",
                    labels.generated_on_prefix,
                    format_day(generated_on, &self.cfg.calendar)
                ),
                style,
            ),
            Block::Spacer(3.0),
            Block::text(labels.generated_notice, style),
        ]
    }
}

fn status_color(status: &PaymentStatus) -> Color {
    match status {
        PaymentStatus::Paid => palette::PAID,
        PaymentStatus::Unpaid => palette::UNPAID,
        _ => palette::PARTIAL,
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
