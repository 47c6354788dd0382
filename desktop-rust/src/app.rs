use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui::text::LayoutJob;
use eframe::egui::{self, Color32, FontId, RichText, TextFormat};
use eframe::egui::{FontData, FontDefinitions, FontFamily};

use crate::io::{expand_references, pick_primary, pick_reference_folder, pick_references, save_report};
use crate::model::{file_label, AppState, Status};
use text_proof::config::Config;
use text_proof::extractor::{is_reference_path, FailurePolicy, PrimaryFormat, ReferenceOptions};
use text_proof::worker::{self, Job, JobOutcome};
use text_proof_common::{MatchMode, Phase, ReportLine, ReportView, SpanStyle};

const NOT_FOUND_COLOR: Color32 = Color32::from_rgb(230, 80, 80);
const DUPLICATE_COLOR: Color32 = Color32::from_rgb(80, 190, 110);
const CURRENT_LINE_COLOR: Color32 = Color32::from_rgb(110, 90, 20);
const ACCENT_COLOR: Color32 = Color32::from_rgb(246, 196, 69);

pub struct DesktopApp {
    state: AppState,
    job_tx: Sender<JobOutcome>,
    job_rx: Receiver<JobOutcome>,
    /// 実行中のジョブ数
    running: usize,
    running_label: &'static str,
}

impl DesktopApp {
    fn spawn(&mut self, job: Job) {
        self.running += 1;
        self.running_label = job.describe();
        worker::spawn(job, self.job_tx.clone());
    }

    fn open_primary(&mut self) {
        if let Some(path) = pick_primary() {
            self.load_primary(path);
        }
    }

    fn load_primary(&mut self, path: PathBuf) {
        let job = self.state.primary_job(path);
        self.spawn(job);
    }

    fn open_references(&mut self) {
        if let Some(paths) = pick_references() {
            self.load_references(paths);
        }
    }

    fn open_reference_folder(&mut self) {
        if let Some(folder) = pick_reference_folder() {
            self.load_references(vec![folder]);
        }
    }

    fn load_references(&mut self, inputs: Vec<PathBuf>) {
        match expand_references(&inputs) {
            Ok(paths) => {
                let job = self.state.reference_job(paths);
                self.spawn(job);
            }
            Err(err) => self.state.status = Status::Error(format!("{err:#}")),
        }
    }

    fn reload_references(&mut self) {
        if let Some(job) = self.state.reload_reference_job() {
            self.spawn(job);
        }
    }

    fn save_report(&mut self) {
        let Some(outcome) = self.state.session.outcome().cloned() else {
            return;
        };
        match save_report(&outcome, self.state.view) {
            Ok(Some(path)) => {
                self.state.status = Status::Info(format!("レポートを保存しました: {}", path.display()))
            }
            Ok(None) => {}
            Err(err) => self.state.status = Status::Error(format!("{err:#}")),
        }
    }

    /// ドロップされたファイルを拡張子で振り分ける
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        if dropped.is_empty() {
            return;
        }

        let mut references = Vec::new();
        for path in dropped {
            if PrimaryFormat::from_path(&path).is_ok() {
                self.load_primary(path);
            } else if path.is_dir() || is_reference_path(&path) {
                references.push(path);
            } else {
                self.state.status = Status::Error(format!("未対応のファイル形式です: {}", path.display()));
            }
        }
        if !references.is_empty() {
            self.load_references(references);
        }
    }

    fn poll_jobs(&mut self) {
        while let Ok(outcome) = self.job_rx.try_recv() {
            self.running = self.running.saturating_sub(1);
            if let Some(next) = self.state.apply(outcome) {
                self.spawn(next);
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (locate, next, previous) = ctx.input(|i| {
            (
                i.modifiers.command && i.key_pressed(egui::Key::F),
                i.key_pressed(egui::Key::F3) && !i.modifiers.shift,
                i.key_pressed(egui::Key::F3) && i.modifiers.shift,
            )
        });
        if locate {
            self.state.locate();
        }
        if next {
            self.state.next();
        }
        if previous {
            self.state.previous();
        }
    }

    fn render_menu(&mut self, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("ファイル", |ui| {
                if ui.button("本文を開く (TXT / PDF)").clicked() {
                    self.open_primary();
                    ui.close_menu();
                }
                if ui.button("校正ファイルを開く (Excel)").clicked() {
                    self.open_references();
                    ui.close_menu();
                }
                if ui.button("校正フォルダを開く").clicked() {
                    self.open_reference_folder();
                    ui.close_menu();
                }
                ui.separator();
                let has_outcome = self.state.session.outcome().is_some();
                if ui.add_enabled(has_outcome, egui::Button::new("レポートを保存")).clicked() {
                    self.save_report();
                    ui.close_menu();
                }
                if ui.button("リセット").clicked() {
                    self.state.reset();
                    ui.close_menu();
                }
            });

            ui.menu_button("照合設定", |ui| {
                let mut options = self.state.options;
                ui.radio_value(&mut options.mode, MatchMode::Contains, "部分一致 (contains)");
                ui.radio_value(&mut options.mode, MatchMode::Exact, "完全一致 (exact)");
                ui.separator();
                ui.checkbox(&mut options.all_sheets, "全シートを読み込む");
                let mut skip = options.on_error == FailurePolicy::Skip;
                if ui.checkbox(&mut skip, "読めないファイルをスキップ").changed() {
                    options.on_error = if skip { FailurePolicy::Skip } else { FailurePolicy::Abort };
                }

                if options.mode != self.state.options.mode
                    || options.all_sheets != self.state.options.all_sheets
                    || options.on_error != self.state.options.on_error
                {
                    self.state.options = options;
                    self.reload_references();
                }
            });

            ui.menu_button("表示", |ui| {
                let mut view = self.state.view;
                ui.radio_value(&mut view, ReportView::Summary, "一覧");
                ui.radio_value(&mut view, ReportView::Inline, "本文");
                self.state.set_view(view);
                ui.separator();
                ui.checkbox(&mut self.state.show_preview, "清書プレビュー");
            });
        });
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let compared = self.state.session.phase() == Phase::Compared;
            let has_items = !self.state.session.cursor().is_empty();

            if ui.button("本文…").clicked() {
                self.open_primary();
            }
            if ui.button("校正ファイル…").clicked() {
                self.open_references();
            }
            ui.separator();

            if ui.add_enabled(has_items, egui::Button::new("◀ 前へ")).clicked() {
                self.state.previous();
            }
            if ui.add_enabled(has_items, egui::Button::new("次へ ▶")).clicked() {
                self.state.next();
            }
            if ui
                .add_enabled(has_items, egui::Button::new("検索 (Ctrl+F)"))
                .on_hover_text("先頭の不一致へ移動")
                .clicked()
            {
                self.state.locate();
            }
            if compared {
                ui.label(self.state.session.cursor().position_label());
            }

            ui.separator();
            let mut view = self.state.view;
            ui.selectable_value(&mut view, ReportView::Summary, "一覧");
            ui.selectable_value(&mut view, ReportView::Inline, "本文");
            self.state.set_view(view);
        });
    }

    fn render_status(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if self.running > 0 {
                ui.spinner();
                ui.label(self.running_label);
                ui.separator();
            }

            let primary = self
                .state
                .primary_path
                .as_deref()
                .map(file_label)
                .unwrap_or_else(|| "未選択".to_string());
            ui.label(format!("本文: {primary}"));
            ui.label(format!("校正ファイル: {}件", self.state.reference_paths.len()));
            if !self.state.skipped.is_empty() {
                let names: Vec<String> = self.state.skipped.iter().map(|s| file_label(&s.path)).collect();
                ui.label(RichText::new(format!("スキップ: {}件", names.len())).color(ACCENT_COLOR))
                    .on_hover_text(names.join("\n"));
            }
            ui.separator();

            match &self.state.status {
                Status::Idle => {}
                Status::Info(message) => {
                    ui.label(RichText::new(message).color(Color32::from_gray(170)));
                }
                Status::Error(message) => {
                    ui.label(RichText::new(message).color(NOT_FOUND_COLOR));
                }
            }
        });
    }

    fn render_report(&mut self, ui: &mut egui::Ui) {
        let Some(outcome) = self.state.session.outcome().cloned() else {
            ui.centered_and_justified(|ui| {
                ui.label(placeholder(self.state.session.phase()));
            });
            return;
        };

        let current = self.state.current_line();
        let scroll = self.state.take_scroll();
        let report = outcome.report(self.state.view);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (index, line) in report.lines.iter().enumerate() {
                    let is_current = current == Some(index);
                    let job = layout_line(ui, line, is_current);
                    let response = ui.label(job);
                    if is_current && scroll {
                        response.scroll_to_me(Some(egui::Align::Center));
                    }
                }
            });
    }

    fn render_preview(&mut self, ctx: &egui::Context) {
        let mut open = self.state.show_preview;
        egui::Window::new("清書プレビュー")
            .open(&mut open)
            .default_width(480.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().max_height(480.0).show(ui, |ui| {
                    match self.state.session.document() {
                        Some(document) => {
                            ui.label(RichText::new(format!(
                                "本文: {}行 / {}トークン（{}種類）",
                                document.lines.len(),
                                document.token_count(),
                                document.unique_count()
                            )).strong());
                            ui.label(document.normalized_text());
                        }
                        None => {
                            ui.label("本文が未選択です");
                        }
                    }
                    ui.separator();
                    match self.state.session.corpus() {
                        Some(corpus) => {
                            ui.label(RichText::new(format!(
                                "校正コーパス: {}モード / サイズ {}",
                                corpus.mode(),
                                corpus.size()
                            )).strong());
                            for value in corpus.sample(50) {
                                ui.label(value);
                            }
                        }
                        None => {
                            ui.label("校正ファイルが未選択です");
                        }
                    }
                });
            });
        self.state.show_preview = open;
    }
}

fn placeholder(phase: Phase) -> &'static str {
    match phase {
        Phase::Empty => "本文（TXT / PDF）と校正ファイル（Excel）を選択してください\nファイルのドロップにも対応しています",
        Phase::HasPrimary => "校正ファイル（Excel）を選択してください",
        Phase::HasReference => "本文（TXT / PDF）を選択してください",
        Phase::Ready | Phase::Compared => "照合結果はありません",
    }
}

fn layout_line(ui: &egui::Ui, line: &ReportLine, is_current: bool) -> LayoutJob {
    let visuals = ui.visuals();
    let font_id = FontId::proportional(15.0);
    let background = if is_current { CURRENT_LINE_COLOR } else { Color32::TRANSPARENT };

    let mut job = LayoutJob::default();
    if line.spans.is_empty() {
        job.append(" ", 0.0, TextFormat { font_id, background, ..Default::default() });
        return job;
    }

    for span in &line.spans {
        let color = match span.style {
            SpanStyle::NotFound => NOT_FOUND_COLOR,
            SpanStyle::Duplicate => DUPLICATE_COLOR,
            SpanStyle::Heading => visuals.strong_text_color(),
            SpanStyle::Found | SpanStyle::Plain => visuals.text_color(),
        };
        job.append(
            &span.text,
            0.0,
            TextFormat {
                font_id: font_id.clone(),
                color,
                background,
                ..Default::default()
            },
        );
    }
    job
}

/// 日本語表示用のフォント（見つかった最初のものを使う）
const CJK_FONT_CANDIDATES: &[&str] = &[
    r"C:\Windows\Fonts\YuGothM.ttc",
    r"C:\Windows\Fonts\meiryo.ttc",
    "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/fonts-japanese-gothic.ttf",
];

const CJK_FONT_NAME: &str = "cjk";

pub fn configure_fonts(ctx: &egui::Context) {
    let found = CJK_FONT_CANDIDATES
        .iter()
        .find_map(|path| std::fs::read(path).ok().map(|data| (*path, data)));

    match found {
        Some((path, data)) => {
            tracing::debug!(path, "CJK font loaded");
            let mut fonts = FontDefinitions::default();
            install_cjk_font(&mut fonts, data);
            ctx.set_fonts(fonts);
        }
        None => tracing::warn!("no CJK font found, Japanese text may not render"),
    }
}

/// 全ファミリーの先頭に日本語フォントを置く
fn install_cjk_font(fonts: &mut FontDefinitions, data: Vec<u8>) {
    fonts
        .font_data
        .insert(CJK_FONT_NAME.to_owned(), FontData::from_owned(data));
    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .insert(0, CJK_FONT_NAME.to_owned());
    }
}

impl Default for DesktopApp {
    fn default() -> Self {
        let config = Config::load_or_default();
        let options = ReferenceOptions {
            mode: config.match_mode,
            on_error: if config.skip_unreadable { FailurePolicy::Skip } else { FailurePolicy::Abort },
            all_sheets: config.all_sheets,
        };

        let (job_tx, job_rx) = mpsc::channel();
        Self {
            state: AppState::new(options),
            job_tx,
            job_rx,
            running: 0,
            running_label: "",
        }
    }
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.running > 0 {
            ctx.request_repaint();
        }
        self.poll_jobs();
        self.handle_dropped_files(ctx);
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            self.render_menu(ui);
            ui.separator();
            self.render_toolbar(ui);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            self.render_status(ui);
            if let Some(rate) = self.state.rate_label() {
                ui.label(RichText::new(rate).strong());
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_report(ui);
        });

        if self.state.show_preview {
            self.render_preview(ctx);
        }
    }
}
