use leptos::*;

// CSS-in-Rust: one stylesheet for every page, injected once by the app shell.
const MAIN_STYLES: &str = r#"
body {
    font-family: "Inter", system-ui, sans-serif;
    background-color: #f9fafb;
    color: #1f2937;
    margin: 0;
}

.page {
    min-height: 100vh;
    display: flex;
    flex-direction: column;
    padding: 40px 16px;
    box-sizing: border-box;
}

.card {
    background-color: #ffffff;
    border-radius: 12px;
    box-shadow: 0 4px 6px rgba(0, 0, 0, 0.08);
    padding: 24px;
}

.hidden {
    display: none;
}

/* Navigation */
.nav-bar {
    max-width: 72rem;
    width: 100%;
    margin: 0 auto;
    display: flex;
    justify-content: space-between;
    align-items: center;
    position: sticky;
    top: 0;
    z-index: 10;
    padding: 16px;
}

.nav-links {
    display: flex;
    gap: 8px;
}

.nav-link {
    padding: 8px 16px;
    color: #2563eb;
    font-size: 1.1rem;
    font-weight: 500;
    border-radius: 8px;
    text-decoration: none;
    transition: background-color 0.2s ease-out;
}

.nav-link:hover {
    color: #1d4ed8;
    background-color: #eff6ff;
}

.nav-session {
    display: flex;
    align-items: center;
    gap: 12px;
}

.page-header {
    max-width: 56rem;
    width: 100%;
    margin: 0 auto;
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 16px;
}

.page-header h1 {
    font-size: 1.25rem;
    font-weight: 600;
    margin: 0;
}

.back-btn, .link-btn {
    background: none;
    border: none;
    color: #2563eb;
    cursor: pointer;
    font-size: 0.9rem;
    font-weight: 500;
    padding: 4px 8px;
}

.back-btn:hover, .link-btn:hover {
    color: #1d4ed8;
    text-decoration: underline;
}

.spacer {
    width: 80px;
}

/* Landing */
.hero {
    flex: 1;
    display: flex;
    align-items: center;
    justify-content: center;
    padding: 48px 0;
}

.gradient-text {
    font-size: 3rem;
    font-weight: 700;
    text-align: center;
    background: linear-gradient(90deg, #2563eb, #9333ea);
    -webkit-background-clip: text;
    background-clip: text;
    color: transparent;
}

.letter {
    display: inline-block;
    opacity: 0;
    animation: letter-reveal 0.4s ease-out forwards;
}

@keyframes letter-reveal {
    from { opacity: 0; transform: translateY(8px); }
    to { opacity: 1; transform: translateY(0); }
}

.fade-in {
    opacity: 0;
    animation: text-fade-in 0.6s ease-out forwards;
}

@keyframes text-fade-in {
    to { opacity: 1; }
}

.about {
    max-width: 56rem;
    width: 100%;
    margin: 48px auto 0;
    box-sizing: border-box;
}

.about p {
    font-size: 1.1rem;
    line-height: 1.7;
}

.highlight {
    color: #2563eb;
    font-weight: 600;
}

.footer {
    text-align: center;
    color: #6b7280;
    padding: 24px 0 0;
}

.footer-links {
    display: flex;
    justify-content: center;
    gap: 16px;
    margin-top: 8px;
}

.footer-links a {
    color: #4b5563;
}

/* Forms */
.auth-screen {
    min-height: 100vh;
    display: flex;
    align-items: center;
    justify-content: center;
    background-color: #f3f4f6;
}

.auth-card {
    width: 100%;
    max-width: 28rem;
    padding: 32px;
}

.auth-card h2 {
    text-align: center;
    margin-top: 0;
}

.form-field {
    display: flex;
    flex-direction: column;
    margin-bottom: 20px;
}

.text-input {
    padding: 12px;
    border: 1px solid #d1d5db;
    border-radius: 8px;
    font-size: 1rem;
}

.text-input:focus {
    outline: none;
    border-color: #3b82f6;
    box-shadow: 0 0 0 2px rgba(59, 130, 246, 0.4);
}

.text-input.invalid {
    border-color: #ef4444;
}

.field-error {
    color: #ef4444;
    font-size: 0.875rem;
    margin-top: 4px;
}

.primary-btn {
    width: 100%;
    background-color: #2563eb;
    color: #ffffff;
    border: none;
    border-radius: 8px;
    padding: 12px;
    font-size: 1rem;
    font-weight: 500;
    cursor: pointer;
    transition: background-color 0.2s ease-out;
}

.primary-btn:hover:not(:disabled) {
    background-color: #1d4ed8;
}

.primary-btn:disabled {
    background-color: #9ca3af;
    cursor: not-allowed;
}

.switch-form {
    text-align: center;
    font-size: 0.875rem;
    margin-top: 16px;
}

.contact {
    max-width: 42rem;
    width: 100%;
    margin: 48px auto 0;
}

/* Notices */
.notice {
    padding: 12px;
    border-radius: 6px;
    text-align: center;
    font-size: 0.875rem;
    margin-bottom: 16px;
}

.notice p {
    margin: 0;
}

.notice.success {
    color: #16a34a;
    background-color: #f0fdf4;
}

.notice.error {
    color: #dc2626;
    background-color: #fef2f2;
}

.notice.info {
    color: #2563eb;
    background-color: #eff6ff;
}

/* Upload */
.upload-main {
    max-width: 56rem;
    width: 100%;
    margin: 32px auto 0;
    display: flex;
    flex-direction: column;
    gap: 32px;
}

.upload-main h2, .upload-main h3 {
    text-align: center;
    margin-top: 0;
}

.upload-form {
    display: flex;
    flex-direction: column;
    align-items: center;
    gap: 16px;
}

.drop-zone {
    width: 100%;
    max-width: 28rem;
    background-color: #f3f4f6;
    border: 2px dashed #d1d5db;
    border-radius: 8px;
    padding: 24px;
    text-align: center;
    color: #4b5563;
    font-size: 0.875rem;
    cursor: pointer;
    box-sizing: border-box;
    transition: border-color 0.2s ease-out;
}

.drop-zone:hover {
    border-color: #3b82f6;
}

.preview {
    width: 96px;
    height: 96px;
    object-fit: cover;
    border-radius: 6px;
}

.progress {
    width: 100%;
    max-width: 28rem;
}

.progress-bar {
    background-color: #e5e7eb;
    border-radius: 9999px;
    height: 8px;
    overflow: hidden;
}

.progress-fill {
    background-color: #3b82f6;
    height: 100%;
    transition: width 0.3s ease-out;
}

.progress-label {
    text-align: center;
    font-size: 0.75rem;
    color: #4b5563;
    margin: 8px 0 0;
}

.accordion {
    border: 1px solid #e5e7eb;
    border-radius: 8px;
    margin-bottom: 16px;
    overflow: hidden;
}

.accordion-toggle {
    width: 100%;
    background-color: #f3f4f6;
    border: none;
    padding: 12px 16px;
    display: flex;
    justify-content: space-between;
    align-items: center;
    font-size: 0.875rem;
    font-weight: 600;
    cursor: pointer;
}

.accordion-toggle:hover {
    background-color: #e5e7eb;
}

.chevron {
    transition: transform 0.2s ease-out;
}

.chevron.open {
    transform: rotate(180deg);
}

.accordion-body {
    overflow-x: auto;
}

.empty {
    text-align: center;
    color: #6b7280;
    font-size: 0.875rem;
    padding: 12px 16px;
    margin: 0;
}

.file-table {
    width: 100%;
    min-width: 600px;
    border-collapse: collapse;
    text-align: center;
    font-size: 0.875rem;
}

.file-table th {
    background-color: #f3f4f6;
    padding: 8px 16px;
}

.file-table td {
    padding: 8px 16px;
    border-bottom: 1px solid #e5e7eb;
}

.file-table tbody tr:nth-child(even) {
    background-color: #f9fafb;
}

.truncate {
    max-width: 16rem;
    overflow: hidden;
    text-overflow: ellipsis;
    white-space: nowrap;
}

.actions {
    display: flex;
    justify-content: center;
    gap: 12px;
}

.action {
    background: none;
    border: none;
    cursor: pointer;
    font-size: 0.8rem;
    font-weight: 500;
    text-decoration: none;
}

.action.open { color: #16a34a; }
.action.download { color: #2563eb; }
.action.delete { color: #dc2626; }

@media (max-width: 768px) {
    .nav-bar {
        flex-direction: column;
        gap: 8px;
    }

    .gradient-text {
        font-size: 2rem;
    }
}
"#;

#[component]
pub fn StyleProvider() -> impl IntoView {
    view! {
        <style>{MAIN_STYLES}</style>
    }
}
