use std::{io::Cursor, sync::Arc, time::Duration};

use printpdf::{Mm, PdfDocument, Pt};

use crate::{
    ExportError, FontResource, Layout, RecipeStore, RenderError, RenderedPage, ShoppingList,
    TITLE, build_shopping_list, build_shopping_list_within,
};

/// Encodes laid out pages into a downloadable document.
pub trait DocumentRenderer: Send + Sync {
    fn layout(&self) -> Layout;

    fn render(&self, pages: &[RenderedPage]) -> Result<Vec<u8>, RenderError>;
}

pub struct PdfRenderer {
    font: Arc<FontResource>,
    layout: Layout,
}

impl PdfRenderer {
    pub fn new(font: Arc<FontResource>) -> Self {
        Self {
            font,
            layout: Layout::default(),
        }
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }
}

impl DocumentRenderer for PdfRenderer {
    fn layout(&self) -> Layout {
        self.layout
    }

    fn render(&self, pages: &[RenderedPage]) -> Result<Vec<u8>, RenderError> {
        let width = Mm::from(Pt(self.layout.page_width));
        let height = Mm::from(Pt(self.layout.page_height));
        let (doc, first_page, first_layer) = PdfDocument::new(TITLE, width, height, "Layer 1");

        let font = match self.font.as_ref() {
            FontResource::Builtin(font) => doc.add_builtin_font(*font),
            FontResource::TrueType(bytes) => doc.add_external_font(Cursor::new(bytes.as_slice())),
        }
        .map_err(|err| RenderError::FontUnavailable(err.to_string()))?;

        let mut current = (first_page, first_layer);
        for page in pages {
            if page.index > 0 {
                current = doc.add_page(width, height, "Layer 1");
            }

            let layer = doc.get_page(current.0).get_layer(current.1);
            for line in &page.lines {
                if !self.font.encodes(&line.text) {
                    return Err(RenderError::Unencodable(line.text.to_owned()));
                }

                layer.use_text(
                    line.text.as_str(),
                    self.layout.font_size,
                    Mm::from(Pt(line.x)),
                    Mm::from(Pt(line.y)),
                    &font,
                );
            }
        }

        doc.save_to_bytes()
            .map_err(|err| RenderError::Pdf(err.to_string()))
    }
}

/// An encoded shopping list, ready to be streamed to the client.
#[derive(Debug)]
pub struct ShoppingListDocument {
    bytes: Vec<u8>,
    page_count: usize,
}

impl ShoppingListDocument {
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Reader positioned at the start of the document.
    pub fn into_reader(self) -> Cursor<Vec<u8>> {
        Cursor::new(self.bytes)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

pub fn render_shopping_list<R: DocumentRenderer + ?Sized>(
    list: &ShoppingList,
    renderer: &R,
) -> Result<ShoppingListDocument, ExportError> {
    let pages = renderer.layout().paginate(list);
    let bytes = renderer.render(&pages)?;

    Ok(ShoppingListDocument {
        bytes,
        page_count: pages.len(),
    })
}

/// Builds the user's shopping list and encodes it off the async runtime.
pub async fn export_shopping_list<S, R>(
    store: &S,
    renderer: Arc<R>,
    user_id: &str,
    deadline: Option<Duration>,
) -> Result<ShoppingListDocument, ExportError>
where
    S: RecipeStore + ?Sized,
    R: DocumentRenderer + ?Sized + 'static,
{
    let list = match deadline {
        Some(deadline) => build_shopping_list_within(store, user_id, deadline).await?,
        None => build_shopping_list(store, user_id).await?,
    };

    let document =
        tokio::task::spawn_blocking(move || render_shopping_list(&list, renderer.as_ref()))
            .await
            .map_err(|err| RenderError::Pdf(err.to_string()))??;

    tracing::info!(
        user_id,
        pages = document.page_count(),
        bytes = document.bytes().len(),
        "shopping list exported"
    );

    Ok(document)
}

#[cfg(test)]
mod tests {
    use std::{io::Read, sync::Mutex};

    use super::*;
    use crate::{IngredientLine, PlacedLine, aggregation::tests::MemoryStore};

    #[derive(Default)]
    struct RecordingRenderer {
        pages: Mutex<Vec<RenderedPage>>,
    }

    impl DocumentRenderer for RecordingRenderer {
        fn layout(&self) -> Layout {
            Layout::default()
        }

        fn render(&self, pages: &[RenderedPage]) -> Result<Vec<u8>, RenderError> {
            *self.pages.lock().unwrap() = pages.to_vec();

            Ok(b"recorded".to_vec())
        }
    }

    fn list_of(count: u32) -> ShoppingList {
        ShoppingList::aggregate(
            (0..count).map(|i| IngredientLine::new(format!("Item {i:03}"), "g", 10)),
        )
    }

    #[test]
    fn test_renderer_receives_paginated_lines() -> anyhow::Result<()> {
        let renderer = RecordingRenderer::default();
        let document = render_shopping_list(&list_of(40), &renderer)?;

        assert_eq!(document.page_count(), 2);
        assert_eq!(document.bytes(), b"recorded");

        let pages = renderer.pages.lock().unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(
            pages[0].lines[1],
            PlacedLine {
                x: 100.0,
                y: 700.0,
                text: "Item 000, g:   10".to_owned(),
            }
        );
        assert_eq!(pages[1].lines.len(), 10);

        Ok(())
    }

    #[test]
    fn test_pdf_bytes() -> anyhow::Result<()> {
        let renderer = PdfRenderer::new(Arc::new(FontResource::default()));
        let document = render_shopping_list(&list_of(100), &renderer)?;

        assert_eq!(document.page_count(), 4);
        assert!(document.bytes().starts_with(b"%PDF"));

        let mut reader = document.into_reader();
        assert_eq!(reader.position(), 0);

        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        assert_eq!(&magic, b"%PDF");

        Ok(())
    }

    #[test]
    fn test_cyrillic_entries() -> anyhow::Result<()> {
        let list = ShoppingList::aggregate([
            IngredientLine::new("Мука", "г", 100),
            IngredientLine::new("Мука", "г", 250),
        ]);

        let recorder = RecordingRenderer::default();
        render_shopping_list(&list, &recorder)?;
        assert_eq!(recorder.pages.lock().unwrap()[0].lines[1].text, "Мука, г:   350");

        let renderer = PdfRenderer::new(Arc::new(FontResource::default()));
        let document = render_shopping_list(&list, &renderer)?;
        assert!(document.bytes().starts_with(b"%PDF"));

        let renderer = PdfRenderer::new(Arc::new(FontResource::builtin("Helvetica")?));
        assert!(matches!(
            render_shopping_list(&list, &renderer),
            Err(ExportError::Render(RenderError::Unencodable(text))) if text == "Мука, г:   350"
        ));

        Ok(())
    }

    #[test]
    fn test_empty_pdf() -> anyhow::Result<()> {
        let renderer = PdfRenderer::new(Arc::new(FontResource::default()));
        let document = render_shopping_list(&ShoppingList::default(), &renderer)?;

        assert_eq!(document.page_count(), 1);
        assert!(document.bytes().starts_with(b"%PDF"));

        Ok(())
    }

    #[tokio::test]
    async fn test_export_from_store() -> anyhow::Result<()> {
        let store = MemoryStore(vec![
            IngredientLine::new("Flour", "g", 100),
            IngredientLine::new("Flour", "g", 250),
            IngredientLine::new("Flour", "kg", 1),
        ]);
        let renderer = Arc::new(RecordingRenderer::default());

        let document = export_shopping_list(
            &store,
            renderer.clone(),
            "john",
            Some(Duration::from_secs(1)),
        )
        .await?;
        assert_eq!(document.page_count(), 1);

        let texts: Vec<_> = renderer.pages.lock().unwrap()[0]
            .lines
            .iter()
            .map(|l| l.text.to_owned())
            .collect();
        assert_eq!(texts, ["Shopping List", "Flour, g:   350", "Flour, kg:   1"]);

        Ok(())
    }
}
