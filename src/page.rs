//! Server-rendered brief form page.

use crate::{
    form::{BriefForm, CopySection, NOTICE_LIFETIME},
    models::{
        Brief, GeneratedPlan, Scene, AGE_RANGES, CADENCES, DEFAULT_CREATIVITY, MAX_RUNTIME_SECONDS,
        MIN_RUNTIME_SECONDS, TONES,
    },
};

const HEAD: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>KidShorts Studio</title>
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <link href="https://cdn.jsdelivr.net/npm/tailwindcss@3.2.7/dist/tailwind.min.css" rel="stylesheet">
  </head>
  <body class="p-4 max-w-5xl mx-auto">
    <h1 class="text-2xl font-bold mb-1">KidShorts Studio</h1>
    <p class="mb-4 text-gray-600">Fill in the brief and get a storyboard, script and publishing kit for your next short.</p>
"#;

const SCRIPT: &str = r#"
    <script>
      document.getElementById('briefForm').addEventListener('submit', function (e) {
        if (e.submitter && e.submitter.formAction.endsWith('/reset')) return;
        const button = document.getElementById('generateButton');
        if (button.disabled) { e.preventDefault(); return; }
        button.disabled = true;
        button.textContent = 'Generating…';
        document.getElementById('busy').classList.remove('hidden');
      });
      for (const input of document.querySelectorAll('input[type=range]')) {
        input.addEventListener('input', function () {
          document.getElementById(input.id + 'Value').textContent = input.value;
        });
      }
      async function copySection(key) {
        const source = document.getElementById('copy-' + key);
        const notice = document.getElementById('notice');
        if (!source || !navigator.clipboard) return;
        try {
          await navigator.clipboard.writeText(source.value);
        } catch (_) {
          return;
        }
        notice.textContent = 'Copied to clipboard!';
        clearTimeout(window.noticeTimer);
        window.noticeTimer = setTimeout(function () { notice.textContent = ''; }, NOTICE_MS);
      }
    </script>
  </body>
</html>
"#;

/// Minimal HTML escaping for text and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render(form: &BriefForm, configured: bool) -> String {
    let mut html = String::from(HEAD);

    if !configured {
        html.push_str(
            r#"    <div class="border border-yellow-400 bg-yellow-50 rounded p-2 mb-4">Generation is disabled until OPENAI_API_KEY is set on the server.</div>
"#,
        );
    }

    render_form(&mut html, &form.brief);

    if let Some(error) = &form.error {
        html.push_str(&format!(
            "    <div id=\"error\" class=\"border border-red-400 bg-red-50 text-red-700 rounded p-2 my-4\">{}</div>\n",
            escape(error)
        ));
    }

    if let Some(plan) = &form.plan {
        render_quick_preview(&mut html, form.quick_preview());
        render_plan(&mut html, form, plan);
    }

    html.push_str(&SCRIPT.replace("NOTICE_MS", &NOTICE_LIFETIME.as_millis().to_string()));
    html
}

fn text_input(html: &mut String, name: &str, label: &str, value: &str, placeholder: &str) {
    html.push_str(&format!(
        r#"        <div>
          <label class="block font-medium" for="{name}">{label}</label>
          <input type="text" id="{name}" name="{name}" value="{}" placeholder="{placeholder}" class="border rounded w-full p-1" />
        </div>
"#,
        escape(value)
    ));
}

fn select(html: &mut String, name: &str, label: &str, options: &[&str], selected: &str) {
    html.push_str(&format!(
        r#"        <div>
          <label class="block font-medium" for="{name}">{label}</label>
          <select id="{name}" name="{name}" class="border rounded w-full p-1">
"#
    ));
    for option in options {
        let marker = if *option == selected { " selected" } else { "" };
        html.push_str(&format!(
            "            <option value=\"{0}\"{marker}>{0}</option>\n",
            escape(option)
        ));
    }
    html.push_str("          </select>\n        </div>\n");
}

fn render_form(html: &mut String, brief: &Brief) {
    html.push_str(
        r#"    <form id="briefForm" action="/" method="post" class="grid grid-cols-1 md:grid-cols-2 gap-4">
"#,
    );
    text_input(html, "channelName", "Channel name", &brief.channel_name, "Sprout TV");
    text_input(html, "topic", "Topic", &brief.topic, "How bees make honey");
    select(html, "ageRange", "Target age", &AGE_RANGES, &brief.age_range);
    text_input(
        html,
        "learningOutcome",
        "Learning outcome",
        &brief.learning_outcome,
        "Kids can name the parts of a flower",
    );
    select(html, "tone", "Tone", &TONES, &brief.tone);
    text_input(html, "heroCharacter", "Hero character", &brief.hero_character, "Captain Buzz");
    text_input(
        html,
        "callToAction",
        "Call to action",
        &brief.call_to_action,
        "Subscribe for weekly science fun",
    );
    select(html, "cadence", "Cadence", &CADENCES, &brief.cadence);

    let runtime = brief.effective_runtime();
    let creativity = brief.effective_creativity().unwrap_or(DEFAULT_CREATIVITY);
    html.push_str(&format!(
        r#"        <div>
          <label class="block font-medium" for="runtimeSeconds">Runtime: <span id="runtimeSecondsValue">{runtime}</span>s</label>
          <input type="range" id="runtimeSeconds" name="runtimeSeconds" min="{MIN_RUNTIME_SECONDS}" max="{MAX_RUNTIME_SECONDS}" step="5" value="{runtime}" class="w-full" />
        </div>
        <div>
          <label class="block font-medium" for="creativity">Creativity: <span id="creativityValue">{creativity:.2}</span></label>
          <input type="range" id="creativity" name="creativity" min="0" max="1" step="0.05" value="{creativity:.2}" class="w-full" />
        </div>
        <div class="md:col-span-2">
          <label class="block font-medium" for="extraNotes">Extra notes</label>
          <textarea id="extraNotes" name="extraNotes" class="border rounded w-full p-1 h-24">{}</textarea>
        </div>
        <div class="md:col-span-2 flex items-center gap-2">
          <button id="generateButton" type="submit" class="bg-blue-500 text-white px-4 py-2 rounded">Generate plan</button>
          <button type="submit" formaction="/reset" class="bg-gray-200 px-4 py-2 rounded">Reset</button>
          <span id="busy" class="hidden text-gray-600">Writing your storyboard…</span>
        </div>
    </form>
"#,
        escape(&brief.extra_notes)
    ));
}

fn render_scene(html: &mut String, scene: &Scene) {
    html.push_str(&format!(
        r#"        <li class="border rounded p-2">
          <div class="font-medium">{} <span class="text-gray-500">{}</span></div>
          <div>{}</div>
          <div class="text-gray-600">Visuals: {}</div>
          <div class="text-gray-600">Sound: {}</div>
        </li>
"#,
        escape(&scene.beat),
        escape(&scene.timing),
        escape(&scene.narration),
        escape(&scene.visuals),
        escape(&scene.sound_design)
    ));
}

fn render_quick_preview(html: &mut String, scenes: &[Scene]) {
    html.push_str(
        r#"    <section id="quickPreview" class="my-4">
      <h2 class="text-xl font-bold">Quick preview</h2>
      <ol class="space-y-2">
"#,
    );
    for scene in scenes {
        render_scene(html, scene);
    }
    html.push_str("      </ol>\n    </section>\n");
}

fn render_list(html: &mut String, title: &str, items: &[String]) {
    html.push_str(&format!(
        "      <h3 class=\"font-bold mt-4\">{}</h3>\n",
        escape(title)
    ));
    html.push_str("      <ul class=\"list-disc ml-6\">\n");
    for item in items {
        html.push_str(&format!("        <li>{}</li>\n", escape(item)));
    }
    html.push_str("      </ul>\n");
}

fn render_plan(html: &mut String, form: &BriefForm, plan: &GeneratedPlan) {
    html.push_str(&format!(
        r#"    <section id="plan" class="my-4">
      <h2 class="text-xl font-bold">{}</h2>
      <p class="italic">{}</p>
      <h3 class="font-bold mt-4">Storyboard</h3>
      <ol class="space-y-2">
"#,
        escape(&plan.headline),
        escape(&plan.hook)
    ));
    for scene in &plan.storyline {
        render_scene(html, scene);
    }
    html.push_str(&format!(
        r#"      </ol>
      <h3 class="font-bold mt-4">Script</h3>
      <pre class="whitespace-pre-wrap bg-gray-50 p-2 rounded">{}</pre>
"#,
        escape(&plan.script)
    ));
    render_list(html, "Educational moments", &plan.educational_moments);
    html.push_str(&format!(
        r#"      <h3 class="font-bold mt-4">Call to action</h3>
      <p>{}</p>
"#,
        escape(&plan.call_to_action)
    ));
    render_list(html, "Safety checklist", &plan.safety_checklist);

    let meta = &plan.metadata;
    html.push_str(&format!(
        r#"      <h3 class="font-bold mt-4">Metadata</h3>
      <p>{}</p>
      <p class="text-blue-700">{}</p>
      <p class="text-gray-600">Keywords: {}</p>
      <p class="text-gray-600">Tip: {}</p>
"#,
        escape(&meta.description),
        escape(&meta.hashtags.join(" ")),
        escape(&meta.keywords.join(", ")),
        escape(&meta.publishing_tip)
    ));
    render_list(html, "Thumbnail ideas", &plan.thumbnail_ideas);
    render_list(html, "Repurposing ideas", &plan.repurposing_ideas);

    html.push_str("      <div class=\"flex flex-wrap gap-2 mt-4\">\n");
    for section in CopySection::ALL {
        if let Some(text) = form.copy_text(section) {
            let key = section.key();
            html.push_str(&format!(
                r#"        <textarea id="copy-{key}" class="hidden">{}</textarea>
        <button type="button" onclick="copySection('{key}')" class="bg-green-500 text-white px-3 py-1 rounded">{}</button>
"#,
                escape(&text),
                section.label()
            ));
        }
    }
    html.push_str(
        r#"        <span id="notice" class="text-green-700"></span>
      </div>
    </section>
"#,
    );
}
