//! Webhook statistics view.

use crate::api::FetchTransport;
use crate::dom::{self, Shell, on_click};
use crate::router;
use crate::state;
use nf_api_types::WebhookStatistics;
use nf_console_model::StatisticsModel;
use nf_resource::Params;
use nf_webhook_client::{Scope, Webhook};
use wasm_bindgen::JsCast;

pub async fn show(shell: Shell, params: Params, generation: u64) {
    let loaded = Webhook::with_scope(FetchTransport, Scope::Statistics)
        .load(&params)
        .await;
    if !state::is_current(generation) {
        return;
    }
    let statistics: WebhookStatistics = match loaded {
        Ok(value) => match serde_json::from_value(value) {
            Ok(statistics) => statistics,
            Err(err) => {
                shell.show_error(&format!("malformed statistics: {err}"));
                return;
            }
        },
        Err(err) => {
            shell.show_error(&err.to_string());
            return;
        }
    };

    let model = StatisticsModel::new(statistics);
    render(&shell, &model);
    wire(&shell, &params);
}

fn render(shell: &Shell, model: &StatisticsModel) {
    let rows: String = model
        .rows()
        .iter()
        .map(|row| {
            format!(
                r#"<tr>
                  <td class="state state-{state}">{state}</td>
                  <td>{count}</td>
                  <td>{min}</td>
                  <td>{avg}</td>
                  <td>{max}</td>
                </tr>"#,
                state = row.state.as_str(),
                count = row.statistics.message_count,
                min = millis(row.statistics.min_exec_time.map(|time| time as f64)),
                avg = millis(row.statistics.avg_exec_time),
                max = millis(row.statistics.max_exec_time.map(|time| time as f64)),
            )
        })
        .collect();

    let html = format!(
        r#"
        <h2>Statistics {name}</h2>
        <table class="list">
          <thead>
            <tr><th>State</th><th>Messages</th><th>Min</th><th>Avg</th><th>Max</th></tr>
          </thead>
          <tbody>{rows}</tbody>
          <tfoot>
            <tr><th>Total</th><td colspan="4">{total}</td></tr>
          </tfoot>
        </table>
        <div class="toolbar">
          <button id="retryFailedBtn" class="primary">Retry failed messages</button>
        </div>
        "#,
        name = dom::escape(&model.statistics.hook_name.0),
        total = model.total(),
    );
    dom::set_inner_html(&shell.view, &html);
}

fn millis(value: Option<f64>) -> String {
    value
        .map(|time| format!("{time:.0} ms"))
        .unwrap_or_default()
}

fn wire(shell: &Shell, params: &Params) {
    if let Some(btn) = dom::by_id("retryFailedBtn") {
        let shell = shell.clone();
        let params = params.clone();
        on_click!(btn, move |_: web_sys::MouseEvent| {
            let shell = shell.clone();
            let params = params.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match Webhook::new(FetchTransport).retry_failed(&params).await {
                    Ok(()) => router::dispatch(&shell),
                    Err(err) => shell.show_error(&err.to_string()),
                }
            });
        });
    }
}
